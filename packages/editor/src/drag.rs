//! # Drag-Reorder Protocol
//!
//! A drag is started on a block and ends in a drop: on another block
//! (move before it), on a layout column (move to the end of that column,
//! the only way into an empty one), or on the section container (move to
//! the end of the top level). The state machine only produces the
//! mutation; the store applies it.
//!
//! ```text
//! Idle ──start──→ Dragging ──drop_on_block─────→ Idle  (MoveBefore)
//!                    │    ──drop_on_column─────→ Idle  (MoveIntoColumn)
//!                    │    ──drop_on_container──→ Idle  (MoveToEnd)
//!                    └────cancel───────────────→ Idle
//! ```

use folio_model::{BlockId, Mutation};

use crate::store::SectionId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { section: SectionId, source: BlockId },
}

impl DragState {
    /// Begin dragging `source`. Starting again replaces the current drag.
    pub fn start(&mut self, section: impl Into<SectionId>, source: BlockId) {
        *self = DragState::Dragging {
            section: section.into(),
            source,
        };
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn source(&self) -> Option<&BlockId> {
        match self {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    pub fn drop_on_block(&mut self, section: &str, target: BlockId) -> Option<Mutation> {
        let source = self.finish(section)?;
        Some(Mutation::MoveBefore {
            source_id: source,
            target_id: target,
        })
    }

    pub fn drop_on_column(&mut self, section: &str, layout: BlockId, column: Option<usize>) -> Option<Mutation> {
        let source = self.finish(section)?;
        Some(Mutation::MoveIntoColumn {
            source_id: source,
            layout_id: layout,
            column,
        })
    }

    pub fn drop_on_container(&mut self, section: &str) -> Option<Mutation> {
        let source = self.finish(section)?;
        Some(Mutation::MoveToEnd { source_id: source })
    }

    /// Abandon the drag, returning the block that was being dragged
    pub fn cancel(&mut self) -> Option<BlockId> {
        match std::mem::take(self) {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    /// Every drop returns to Idle; only a drop in the dragging section
    /// yields the source
    fn finish(&mut self, section: &str) -> Option<BlockId> {
        match std::mem::take(self) {
            DragState::Dragging { section: from, source } if from == section => Some(source),
            DragState::Dragging { section: from, source } => {
                tracing::debug!(%source, from = %from, to = section, "drop in another section abandons drag");
                None
            }
            DragState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_on_block_yields_move_before() {
        let mut drag = DragState::default();
        drag.start("s1", BlockId::from("a"));
        assert!(drag.is_dragging());
        assert_eq!(drag.source().map(BlockId::as_str), Some("a"));

        let mutation = drag.drop_on_block("s1", BlockId::from("b"));
        assert_eq!(
            mutation,
            Some(Mutation::MoveBefore {
                source_id: "a".into(),
                target_id: "b".into(),
            })
        );
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_drop_on_container_yields_move_to_end() {
        let mut drag = DragState::default();
        drag.start("s1", BlockId::from("a"));
        assert_eq!(
            drag.drop_on_container("s1"),
            Some(Mutation::MoveToEnd { source_id: "a".into() })
        );
    }

    #[test]
    fn test_drop_on_column_yields_move_into_column() {
        let mut drag = DragState::default();
        drag.start("s1", BlockId::from("a"));
        assert_eq!(
            drag.drop_on_column("s1", BlockId::from("l"), Some(1)),
            Some(Mutation::MoveIntoColumn {
                source_id: "a".into(),
                layout_id: "l".into(),
                column: Some(1),
            })
        );
        assert!(!drag.is_dragging());
        assert!(drag.drop_on_column("s1", BlockId::from("l"), Some(1)).is_none());
    }

    #[test]
    fn test_drop_without_drag_is_ignored() {
        let mut drag = DragState::default();
        assert!(drag.drop_on_block("s1", BlockId::from("b")).is_none());
        assert!(drag.drop_on_container("s1").is_none());
        assert!(drag.cancel().is_none());
    }

    #[test]
    fn test_drop_in_other_section_abandons() {
        let mut drag = DragState::default();
        drag.start("s1", BlockId::from("a"));
        assert!(drag.drop_on_block("s2", BlockId::from("b")).is_none());
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_restart_and_cancel() {
        let mut drag = DragState::default();
        drag.start("s1", BlockId::from("a"));
        drag.start("s1", BlockId::from("c"));
        assert_eq!(drag.cancel(), Some(BlockId::from("c")));
        assert!(!drag.is_dragging());
    }
}
