//! # Document Section Store
//!
//! Owns the ordered section list, one forest per section and the flat
//! fields (titles, remarks, image slots) of a report.
//!
//! A forest is only ever replaced whole. Every replacement bumps the store
//! version and is pushed to subscribers as a [`ForestChanged`], so a view
//! holding an old forest can compare by version instead of by content.

use folio_model::{Block, BlockId, Forest, Mutation, Outcome};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::mpsc::{channel, Receiver, Sender};

use crate::EditorError;

pub type SectionId = String;

/// Id of the section a fresh report starts with
pub const INITIAL_SECTION_ID: &str = "custom-initial";

/// Entry in the ordered section list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    #[serde(default = "default_deletable")]
    pub is_deletable: bool,
    #[serde(default)]
    pub is_locked: bool,
}

fn default_deletable() -> bool {
    true
}

impl Section {
    pub fn new(id: impl Into<SectionId>) -> Self {
        Self {
            id: id.into(),
            is_deletable: true,
            is_locked: false,
        }
    }
}

/// Pushed to subscribers after a section's forest is replaced
#[derive(Debug, Clone, PartialEq)]
pub struct ForestChanged {
    pub section_id: SectionId,
    pub forest: Forest,
    pub version: u64,
}

/// What a mutation did to the store
#[derive(Debug, Clone)]
pub struct AppliedMutation {
    pub outcome: Outcome,

    /// `None` when the mutation was a no-op and nothing was replaced
    pub change: Option<ForestChanged>,
}

#[derive(Debug, Default)]
pub struct DocumentStore {
    sections: Vec<Section>,
    forests: IndexMap<SectionId, Forest>,
    fields: IndexMap<String, Value>,
    version: u64,
    subscribers: Vec<Sender<ForestChanged>>,
}

pub fn title_key(section_id: &str) -> String {
    format!("{}-title", section_id)
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding one section with an empty `1-col` layout
    pub fn with_initial_section(title: &str) -> Self {
        let mut store = Self::new();
        store.insert_section(Section::new(INITIAL_SECTION_ID), title);
        store
    }

    /// Rebuild a store from its persisted parts. Forests of sections that
    /// are no longer listed are kept as they were.
    pub(crate) fn from_parts(
        sections: Vec<Section>,
        forests: IndexMap<SectionId, Forest>,
        fields: IndexMap<String, Value>,
    ) -> Self {
        Self {
            sections,
            forests,
            fields,
            version: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn forests(&self) -> impl Iterator<Item = (&str, &Forest)> {
        self.forests.iter().map(|(id, forest)| (id.as_str(), forest))
    }

    pub fn fields(&self) -> &IndexMap<String, Value> {
        &self.fields
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, section_id: &str) -> Option<&Forest> {
        self.forests.get(section_id)
    }

    /// Forests whose section was deleted from the list
    pub fn orphaned_forests(&self) -> Vec<&str> {
        self.forests
            .keys()
            .filter(|id| self.section(id).is_none())
            .map(String::as_str)
            .collect()
    }

    /// Swap in a section's new forest in one assignment and notify
    pub fn replace(&mut self, section_id: &str, forest: Forest) -> ForestChanged {
        self.forests.insert(section_id.to_string(), forest.clone());
        self.version += 1;

        let change = ForestChanged {
            section_id: section_id.to_string(),
            forest,
            version: self.version,
        };
        self.notify(&change);
        change
    }

    /// Run a mutation against a section's forest. No-ops leave the store
    /// (and its version) untouched.
    pub fn apply(&mut self, section_id: &str, mutation: &Mutation) -> Result<AppliedMutation, EditorError> {
        self.ensure_editable(section_id)?;
        let forest = self
            .get(section_id)
            .ok_or_else(|| EditorError::SectionNotFound(section_id.to_string()))?;

        let edit = mutation.apply(forest);
        tracing::debug!(section = section_id, op = mutation.name(), outcome = ?edit.outcome, "applied mutation");

        let change = edit
            .outcome
            .changed()
            .then(|| self.replace(section_id, edit.forest));
        Ok(AppliedMutation {
            outcome: edit.outcome,
            change,
        })
    }

    /// Refuse edits against locked or unknown sections. Orphaned forests
    /// are still editable.
    pub fn ensure_editable(&self, section_id: &str) -> Result<(), EditorError> {
        match self.section(section_id) {
            Some(section) if section.is_locked => Err(EditorError::SectionLocked(section_id.to_string())),
            _ if self.forests.contains_key(section_id) => Ok(()),
            _ => Err(EditorError::SectionNotFound(section_id.to_string())),
        }
    }

    /// Append a deletable section with a titled, empty `1-col` layout
    pub fn add_section(&mut self, title: &str) -> SectionId {
        let id = BlockId::generate("custom").into_string();
        self.insert_section(Section::new(id.clone()), title);
        tracing::info!(section = %id, "added section");
        id
    }

    fn insert_section(&mut self, section: Section, title: &str) {
        let id = section.id.clone();
        self.fields.insert(title_key(&id), Value::String(title.to_string()));
        self.sections.push(section);
        self.replace(&id, Forest::from_blocks(vec![Block::layout()]));
    }

    /// Drop a section from the list. Its forest and fields stay behind.
    pub fn delete_section(&mut self, section_id: &str) -> Result<(), EditorError> {
        let position = self.position(section_id)?;
        let section = &self.sections[position];
        if section.is_locked {
            return Err(EditorError::SectionLocked(section_id.to_string()));
        }
        if !section.is_deletable {
            return Err(EditorError::SectionNotDeletable(section_id.to_string()));
        }

        self.sections.remove(position);
        tracing::info!(section = section_id, "deleted section");
        Ok(())
    }

    /// Flip the lock and return the new state
    pub fn toggle_lock(&mut self, section_id: &str) -> Result<bool, EditorError> {
        let position = self.position(section_id)?;
        let section = &mut self.sections[position];
        section.is_locked = !section.is_locked;
        tracing::info!(section = section_id, locked = section.is_locked, "toggled lock");
        Ok(section.is_locked)
    }

    /// Move `dragged` to sit immediately before `target` in the section
    /// list. Returns whether the order changed. A locked section cannot
    /// be dragged, though others may be moved around it.
    pub fn move_section(&mut self, dragged: &str, target: &str) -> Result<bool, EditorError> {
        let from = self.position(dragged)?;
        let to = self.position(target)?;
        if self.sections[from].is_locked {
            return Err(EditorError::SectionLocked(dragged.to_string()));
        }
        // already directly before the target
        if from == to || from + 1 == to {
            return Ok(false);
        }

        let section = self.sections.remove(from);
        let to = if from < to { to - 1 } else { to };
        self.sections.insert(to, section);
        Ok(true)
    }

    fn position(&self, section_id: &str) -> Result<usize, EditorError> {
        self.sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| EditorError::SectionNotFound(section_id.to_string()))
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    pub fn title(&self, section_id: &str) -> Option<&str> {
        self.field(&title_key(section_id)).and_then(Value::as_str)
    }

    pub fn set_title(&mut self, section_id: &str, title: &str) -> Result<(), EditorError> {
        self.ensure_editable(section_id)?;
        self.set_field(title_key(section_id), Value::String(title.to_string()));
        Ok(())
    }

    /// Discard every section, forest and field and start over with one
    /// fresh section. Subscribers and the version counter carry on.
    pub fn reset(&mut self, title: &str) -> SectionId {
        self.sections.clear();
        self.forests.clear();
        self.fields.clear();
        tracing::info!("reset document");
        self.add_section(title)
    }

    pub fn subscribe(&mut self) -> Receiver<ForestChanged> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    fn notify(&mut self, change: &ForestChanged) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}
