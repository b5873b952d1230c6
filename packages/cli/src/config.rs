use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// folio configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Report file edited by default
    #[serde(default = "default_report_path")]
    pub report_path: String,

    /// Where saved snapshots are listed
    #[serde(default = "default_recent_path")]
    pub recent_path: String,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    /// Title given to sections added without one
    #[serde(default = "default_section_title")]
    pub new_section_title: String,
}

fn default_report_path() -> String {
    "report.json".to_string()
}

fn default_recent_path() -> String {
    ".folio/recent.json".to_string()
}

fn default_recent_limit() -> usize {
    folio_editor::recent::DEFAULT_LIMIT
}

fn default_section_title() -> String {
    "Section Title".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn report_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.report_path)
    }

    pub fn recent_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.recent_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_path: default_report_path(),
            recent_path: default_recent_path(),
            recent_limit: default_recent_limit(),
            new_section_title: default_section_title(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "reportPath": "reports/site-visit.json",
            "recentLimit": 3
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.report_path, "reports/site-visit.json");
        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.recent_path, ".folio/recent.json");
        assert_eq!(config.new_section_title, "Section Title");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.report_path(Path::new("/work")), PathBuf::from("/work/report.json"));
        assert_eq!(config.recent_limit, 10);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }
}
