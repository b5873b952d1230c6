//! # Report Document
//!
//! A report on disk, or in memory, wrapping a [`DocumentStore`].
//!
//! ## File shape
//!
//! ```text
//! {
//!   "reportData": { "<section>-title": "...", "<section>": [ blocks ], ... },
//!   "sections":   [ { "id": "...", "isDeletable": true, "isLocked": false } ]
//! }
//! ```
//!
//! Keys of `reportData` that name a listed section are block forests. Every
//! other key is a flat field, including forests of sections that were
//! deleted, so those are written back exactly as they were read.

use folio_model::{Forest, Mutation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::store::{AppliedMutation, DocumentStore, Section};
use crate::EditorError;

/// Serialized form of a report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFile {
    #[serde(default)]
    pub report_data: IndexMap<String, Value>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl ReportFile {
    /// Split `reportData` into section forests and flat fields
    pub fn into_store(self) -> Result<DocumentStore, EditorError> {
        let mut forests = IndexMap::new();
        let mut fields = IndexMap::new();

        for (key, value) in self.report_data {
            if !self.sections.iter().any(|s| s.id == key) {
                fields.insert(key, value);
                continue;
            }

            let mut forest: Forest = serde_json::from_value(value)?;
            let resized = forest.normalize();
            if resized > 0 {
                tracing::warn!(section = %key, layouts = resized, "resized layout columns to match their layout");
            }
            let duplicates = forest.duplicate_ids();
            if !duplicates.is_empty() {
                tracing::warn!(section = %key, ?duplicates, "forest contains duplicate block ids");
            }
            forests.insert(key, forest);
        }

        for section in &self.sections {
            if !forests.contains_key(&section.id) {
                tracing::warn!(section = %section.id, "section has no blocks, starting empty");
                forests.insert(section.id.clone(), Forest::new());
            }
        }

        Ok(DocumentStore::from_parts(self.sections, forests, fields))
    }

    pub fn from_store(store: &DocumentStore) -> Result<Self, EditorError> {
        let mut report_data = store.fields().clone();
        for (id, forest) in store.forests() {
            report_data.insert(id.to_string(), serde_json::to_value(forest)?);
        }
        Ok(Self {
            report_data,
            sections: store.sections().to_vec(),
        })
    }
}

/// Editable report
#[derive(Debug)]
pub struct ReportDocument {
    /// Where `save` writes (None for in-memory documents)
    pub path: Option<PathBuf>,

    store: DocumentStore,

    dirty: bool,
}

impl ReportDocument {
    /// In-memory report with one empty section
    pub fn new(title: &str) -> Self {
        Self::from_store(DocumentStore::with_initial_section(title))
    }

    pub fn from_store(store: DocumentStore) -> Self {
        Self {
            path: None,
            store,
            dirty: false,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        let file: ReportFile = serde_json::from_str(json)?;
        Ok(Self::from_store(file.into_store()?))
    }

    /// Load a file-backed report
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let mut document = Self::from_json(&json)?;
        document.path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), sections = document.store.sections().len(), "loaded report");
        Ok(document)
    }

    pub fn to_file(&self) -> Result<ReportFile, EditorError> {
        ReportFile::from_store(&self.store)
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.to_file()?)?)
    }

    pub fn save(&mut self) -> Result<(), EditorError> {
        let path = self.path.clone().ok_or(EditorError::NotFileBacked)?;
        self.write(&path)
    }

    /// Write to `path` and make it the document's backing file
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        let path = path.as_ref().to_path_buf();
        self.write(&path)?;
        self.path = Some(path);
        Ok(())
    }

    fn write(&mut self, path: &Path) -> Result<(), EditorError> {
        std::fs::write(path, self.to_json()?)?;
        self.dirty = false;
        tracing::info!(path = %path.display(), "saved report");
        Ok(())
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Mutable access to the store; marks the document dirty
    pub fn store_mut(&mut self) -> &mut DocumentStore {
        self.dirty = true;
        &mut self.store
    }

    pub fn apply(&mut self, section_id: &str, mutation: &Mutation) -> Result<AppliedMutation, EditorError> {
        let applied = self.store.apply(section_id, mutation)?;
        if applied.change.is_some() {
            self.dirty = true;
        }
        Ok(applied)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
