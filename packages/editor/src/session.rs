//! # Edit Session
//!
//! Routes user intents from the host UI to the document.
//!
//! An EditSession is one client's view of a report: the document itself
//! plus transient gesture state (the block being dragged). Intents arrive
//! as JSON, so the host can stay a thin event forwarder.

use folio_model::{Block, BlockId, BlockKind, BlockPatch, Mutation};
use serde::{Deserialize, Serialize};

use crate::document::ReportDocument;
use crate::drag::DragState;
use crate::store::{ForestChanged, SectionId};
use crate::EditorError;

/// A user action against one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Intent {
    /// Add a fresh block at the top level, or into a layout column
    AddBlock {
        section: SectionId,
        kind: BlockKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        container_id: Option<BlockId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_index: Option<usize>,
    },
    UpdateBlock {
        section: SectionId,
        id: BlockId,
        patch: BlockPatch,
    },
    DeleteBlock {
        section: SectionId,
        id: BlockId,
    },
    DragStart {
        section: SectionId,
        id: BlockId,
    },
    DropOnBlock {
        section: SectionId,
        target_id: BlockId,
    },
    /// Drop onto a layout column, which may be empty
    DropOnColumn {
        section: SectionId,
        container_id: BlockId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column_index: Option<usize>,
    },
    DropOnContainer {
        section: SectionId,
    },
    CancelDrag,
}

impl Intent {
    /// The mutation an intent maps to directly, without gesture state
    fn mutation(&self) -> Option<(&str, Mutation)> {
        match self {
            Intent::AddBlock {
                section,
                kind,
                container_id,
                column_index,
            } => {
                let block = Block::new(*kind);
                let mutation = match container_id {
                    Some(layout_id) => Mutation::InsertIntoColumn {
                        layout_id: layout_id.clone(),
                        column: *column_index,
                        block,
                    },
                    None => Mutation::InsertTopLevel { block },
                };
                Some((section, mutation))
            }
            Intent::UpdateBlock { section, id, patch } => Some((
                section,
                Mutation::UpdateBlock {
                    id: id.clone(),
                    patch: patch.clone(),
                },
            )),
            Intent::DeleteBlock { section, id } => Some((section, Mutation::DeleteBlock { id: id.clone() })),
            _ => None,
        }
    }
}

/// Single edit session over one report
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Report being edited
    pub document: ReportDocument,

    drag: DragState,
}

impl EditSession {
    pub fn new(id: impl Into<String>, document: ReportDocument) -> Self {
        Self {
            id: id.into(),
            document,
            drag: DragState::default(),
        }
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Handle one intent. Returns the replaced forest when the intent
    /// changed a section, `None` when it only moved gesture state or
    /// degraded to a no-op.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Option<ForestChanged>, EditorError> {
        tracing::debug!(session = %self.id, ?intent, "dispatch");

        if let Some((section, mutation)) = intent.mutation() {
            return self.apply(section, &mutation);
        }

        match intent {
            Intent::DragStart { section, id } => {
                self.document.store().ensure_editable(&section)?;
                self.drag.start(section, id);
                Ok(None)
            }
            Intent::DropOnBlock { section, target_id } => match self.drag.drop_on_block(&section, target_id) {
                Some(mutation) => self.apply(&section, &mutation),
                None => Ok(None),
            },
            Intent::DropOnColumn {
                section,
                container_id,
                column_index,
            } => match self.drag.drop_on_column(&section, container_id, column_index) {
                Some(mutation) => self.apply(&section, &mutation),
                None => Ok(None),
            },
            Intent::DropOnContainer { section } => match self.drag.drop_on_container(&section) {
                Some(mutation) => self.apply(&section, &mutation),
                None => Ok(None),
            },
            Intent::CancelDrag => {
                self.drag.cancel();
                Ok(None)
            }
            Intent::AddBlock { .. } | Intent::UpdateBlock { .. } | Intent::DeleteBlock { .. } => Ok(None),
        }
    }

    /// Dispatch intents in order, stopping at the first error
    pub fn replay(&mut self, intents: impl IntoIterator<Item = Intent>) -> Result<Vec<ForestChanged>, EditorError> {
        let mut changes = Vec::new();
        for intent in intents {
            changes.extend(self.dispatch(intent)?);
        }
        Ok(changes)
    }

    fn apply(&mut self, section: &str, mutation: &Mutation) -> Result<Option<ForestChanged>, EditorError> {
        Ok(self.document.apply(section, mutation)?.change)
    }
}
