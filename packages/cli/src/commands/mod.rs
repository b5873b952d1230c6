pub mod block;
pub mod check;
pub mod init;
pub mod replay;
pub mod save;
pub mod section;
pub mod show;

pub use block::{block, BlockArgs};
pub use check::{check, CheckArgs};
pub use init::{init, InitArgs};
pub use replay::{replay, ReplayArgs};
pub use save::{save, SaveArgs};
pub use section::{section, SectionArgs};
pub use show::{show, ShowArgs};

use crate::config::Config;
use anyhow::{bail, Context as _, Result};
use folio_editor::{DocumentStore, ReportDocument, SectionId};
use std::path::PathBuf;

/// Working directory, loaded config and the report file they point at
#[derive(Debug)]
pub struct Context {
    pub cwd: PathBuf,
    pub config: Config,
    pub report: PathBuf,
}

impl Context {
    pub fn new(cwd: PathBuf, report: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(&cwd)?;
        let report = match report {
            Some(path) if path.is_absolute() => path,
            Some(path) => cwd.join(path),
            None => config.report_path(&cwd),
        };
        Ok(Self { cwd, config, report })
    }

    pub fn open(&self) -> Result<ReportDocument> {
        ReportDocument::load(&self.report)
            .with_context(|| format!("Cannot open report {} (run `folio init` first?)", self.report.display()))
    }
}

/// Resolve a section by id, unique id prefix, or 1-based position
pub fn resolve_section(store: &DocumentStore, query: &str) -> Result<SectionId> {
    if let Some(section) = store.section(query) {
        return Ok(section.id.clone());
    }
    if let Ok(position) = query.parse::<usize>() {
        if let Some(section) = position.checked_sub(1).and_then(|i| store.sections().get(i)) {
            return Ok(section.id.clone());
        }
    }

    let matches: Vec<&str> = store
        .sections()
        .iter()
        .map(|s| s.id.as_str())
        .filter(|id| id.starts_with(query))
        .collect();
    match matches.as_slice() {
        [id] => Ok(id.to_string()),
        [] => bail!("No section matches '{}'", query),
        _ => bail!("'{}' matches {} sections", query, matches.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_editor::INITIAL_SECTION_ID;

    #[test]
    fn test_resolve_section() {
        let mut store = DocumentStore::with_initial_section("First");
        let second = store.add_section("Second");

        assert_eq!(resolve_section(&store, INITIAL_SECTION_ID).unwrap(), INITIAL_SECTION_ID);
        assert_eq!(resolve_section(&store, "2").unwrap(), second);
        assert_eq!(resolve_section(&store, "custom-i").unwrap(), INITIAL_SECTION_ID);
        // both ids start with "custom-"
        assert!(resolve_section(&store, "custom-").is_err());
        assert!(resolve_section(&store, "nope").is_err());
    }

    #[test]
    fn test_context_report_path() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(dir.path().to_path_buf(), None).unwrap();
        assert_eq!(ctx.report, dir.path().join("report.json"));

        let ctx = Context::new(dir.path().to_path_buf(), Some(PathBuf::from("other.json"))).unwrap();
        assert_eq!(ctx.report, dir.path().join("other.json"));
        assert!(ctx.open().is_err());
    }
}
