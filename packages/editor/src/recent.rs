//! Most-recent-first list of saved reports, persisted as JSON

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::document::ReportFile;
use crate::EditorError;

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentReport {
    /// Milliseconds since the epoch at save time
    pub id: i64,
    pub name: String,
    /// RFC 3339
    pub timestamp: String,
    pub data: ReportFile,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecentReports {
    entries: Vec<RecentReport>,
    limit: usize,
}

impl Default for RecentReports {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl RecentReports {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Read the list at `path`; a missing file is an empty list
    pub fn load(path: impl AsRef<Path>, limit: usize) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let mut recent = Self::new(limit);
        if !path.exists() {
            return Ok(recent);
        }

        recent.entries = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        recent.entries.truncate(recent.limit);
        Ok(recent)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        std::fs::write(path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }

    /// Put a snapshot at the front, dropping the oldest past the limit
    pub fn record(&mut self, name: impl Into<String>, data: ReportFile) -> &RecentReport {
        let now = Utc::now();
        self.entries.insert(
            0,
            RecentReport {
                id: now.timestamp_millis(),
                name: name.into(),
                timestamp: now.to_rfc3339(),
                data,
            },
        );
        self.entries.truncate(self.limit);
        &self.entries[0]
    }

    pub fn entries(&self) -> &[RecentReport] {
        &self.entries
    }

    /// Newest snapshot saved under `name`
    pub fn find(&self, name: &str) -> Option<&RecentReport> {
        self.entries.iter().find(|r| r.name == name)
    }

    /// Drop the snapshot with this id, returning it
    pub fn remove(&mut self, id: i64) -> Option<RecentReport> {
        let position = self.entries.iter().position(|r| r.id == id)?;
        Some(self.entries.remove(position))
    }

    /// Drop the newest snapshot saved under `name`
    pub fn remove_named(&mut self, name: &str) -> Option<RecentReport> {
        let position = self.entries.iter().position(|r| r.name == name)?;
        Some(self.entries.remove(position))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_caps_and_orders() {
        let mut recent = RecentReports::new(3);
        for n in 0..5 {
            recent.record(format!("report {}", n), ReportFile::default());
        }
        assert_eq!(recent.len(), 3);
        let names: Vec<&str> = recent.entries().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["report 4", "report 3", "report 2"]);
        assert!(recent.find("report 0").is_none());
    }

    #[test]
    fn test_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recent.json");
        let mut recent = RecentReports::new(DEFAULT_LIMIT);
        recent.record("keep", ReportFile::default());
        recent.record("drop", ReportFile::default());
        // two saves can land in the same millisecond
        recent.entries[0].id = 2;
        recent.entries[1].id = 1;

        let removed = recent.remove(2).unwrap();
        assert_eq!(removed.name, "drop");
        assert!(recent.remove(2).is_none());
        recent.save(&path).unwrap();

        let reloaded = RecentReports::load(&path, DEFAULT_LIMIT).unwrap();
        let names: Vec<&str> = reloaded.entries().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["keep"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let recent = RecentReports::load("/definitely/not/here.json", DEFAULT_LIMIT).unwrap();
        assert!(recent.is_empty());
    }
}
