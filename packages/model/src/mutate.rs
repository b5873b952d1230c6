//! # Mutation Engine
//!
//! Every operation takes the current forest by reference and returns a new
//! one inside an [`Edit`]. The input is never modified, so a renderer still
//! holding the old forest never sees a half-applied change. Only the blocks
//! on the route to the change are copied; everything else is shared with
//! the input by pointer.
//!
//! ## Failure policy
//!
//! Nothing here fails. A stale id (the UI racing a just-mutated tree), a
//! column index out of range, or a patch for the wrong variant is recovered
//! locally and reported through [`Outcome`]:
//!
//! - `Noop`: the forest is returned unchanged
//! - `Fallback`: the operation degraded to a simpler one (column insert
//!   that ended up at column 0 or at the top level)
//!
//! ## Move
//!
//! `move_before` removes the source and re-inserts it immediately before the
//! target. When both sit in the same container and the source comes first,
//! the removal shifts the target left by one, so the insertion index is
//! corrected by one. Containers are compared by [`ContainerRef`], so moves
//! between columns and into or out of layouts use the same path.
//! `move_into_column` covers the drop that has no target block: onto a
//! column, typically an empty one.

use crate::block::{Block, BlockKind};
use crate::forest::Forest;
use crate::id::BlockId;
use crate::locate::{self, ContainerRef, Location};
use crate::patch::BlockPatch;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Operations on a forest, as issued by the host UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    /// Shallow-merge a patch into a block
    UpdateBlock { id: BlockId, patch: BlockPatch },

    /// Append a block to the root forest
    InsertTopLevel { block: Block },

    /// Append a block to a layout column
    InsertIntoColumn {
        layout_id: BlockId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<usize>,
        block: Block,
    },

    /// Remove a block and its whole subtree
    DeleteBlock { id: BlockId },

    /// Relocate a block to sit immediately before another
    MoveBefore { source_id: BlockId, target_id: BlockId },

    /// Relocate a block to the end of the root forest
    MoveToEnd { source_id: BlockId },

    /// Relocate a block to the end of a layout column
    MoveIntoColumn {
        source_id: BlockId,
        layout_id: BlockId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        column: Option<usize>,
    },
}

/// Recoverable conditions met while applying a mutation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    LookupMiss(BlockId),

    #[error("Column {column} out of range for layout {layout} ({columns} columns)")]
    InvalidColumnIndex {
        layout: BlockId,
        column: usize,
        columns: usize,
    },

    #[error("Patch for {found} cannot apply to {expected} block {id}")]
    StructuralMismatch {
        id: BlockId,
        expected: BlockKind,
        found: BlockKind,
    },

    #[error("Block {id} is a {kind}, not a layout")]
    NotAContainer { id: BlockId, kind: BlockKind },

    #[error("Block {0} cannot be moved before itself")]
    MoveOntoSelf(BlockId),

    #[error("Block {source_id} cannot be moved inside its own subtree (target {target_id})")]
    MoveIntoOwnSubtree { source_id: BlockId, target_id: BlockId },
}

/// How a mutation was carried out
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    Fallback(MutationError),
    Noop(MutationError),
}

impl Outcome {
    /// True unless the forest was returned untouched
    pub fn changed(&self) -> bool {
        !matches!(self, Outcome::Noop(_))
    }
}

/// Result of a mutation: the new forest and how it was produced
#[derive(Debug, Clone)]
pub struct Edit {
    pub forest: Forest,
    pub outcome: Outcome,
}

impl Edit {
    fn applied(forest: Forest) -> Self {
        Self { forest, outcome: Outcome::Applied }
    }

    fn fallback(forest: Forest, reason: MutationError) -> Self {
        tracing::info!(%reason, "mutation degraded");
        Self { forest, outcome: Outcome::Fallback(reason) }
    }

    fn noop(forest: &Forest, reason: MutationError) -> Self {
        tracing::debug!(%reason, "mutation skipped");
        Self { forest: forest.clone(), outcome: Outcome::Noop(reason) }
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }
}

impl Mutation {
    pub fn apply(&self, forest: &Forest) -> Edit {
        match self {
            Mutation::UpdateBlock { id, patch } => update(forest, id.as_str(), patch),
            Mutation::InsertTopLevel { block } => insert_top_level(forest, block.clone()),
            Mutation::InsertIntoColumn { layout_id, column, block } => {
                insert_into_column(forest, layout_id.as_str(), *column, block.clone())
            }
            Mutation::DeleteBlock { id } => delete(forest, id.as_str()),
            Mutation::MoveBefore { source_id, target_id } => {
                move_before(forest, source_id.as_str(), target_id.as_str())
            }
            Mutation::MoveToEnd { source_id } => move_to_end(forest, source_id.as_str()),
            Mutation::MoveIntoColumn {
                source_id,
                layout_id,
                column,
            } => move_into_column(forest, source_id.as_str(), layout_id.as_str(), *column),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::UpdateBlock { .. } => "update_block",
            Mutation::InsertTopLevel { .. } => "insert_top_level",
            Mutation::InsertIntoColumn { .. } => "insert_into_column",
            Mutation::DeleteBlock { .. } => "delete_block",
            Mutation::MoveBefore { .. } => "move_before",
            Mutation::MoveToEnd { .. } => "move_to_end",
            Mutation::MoveIntoColumn { .. } => "move_into_column",
        }
    }
}

/// Shallow-merge `patch` into the block with `id`
pub fn update(forest: &Forest, id: &str, patch: &BlockPatch) -> Edit {
    let Some(location) = locate::locate(forest, id) else {
        return Edit::noop(forest, MutationError::LookupMiss(id.into()));
    };

    let mut patched = match locate::block_at(forest, &location) {
        Some(block) => Block::clone(block),
        None => return Edit::noop(forest, MutationError::LookupMiss(id.into())),
    };
    if let Err(reason) = patch.apply_to(&mut patched) {
        return Edit::noop(forest, reason);
    }
    let duplicated = patch.duplicated_ids(forest, id);
    if !duplicated.is_empty() {
        tracing::warn!(id, ?duplicated, "patch leaves duplicate ids");
    }

    let mut next = forest.clone();
    match locate::container_mut(&mut next, &location.path) {
        Some(container) => {
            container[location.index] = Arc::new(patched);
            Edit::applied(next)
        }
        None => Edit::noop(forest, MutationError::LookupMiss(id.into())),
    }
}

/// Append `block` to the root forest
pub fn insert_top_level(forest: &Forest, block: Block) -> Edit {
    debug_assert!(
        fresh_ids(forest, &block),
        "inserted block reuses an id already in the forest"
    );
    let mut next = forest.clone();
    next.slots_mut().push(Arc::new(block));
    Edit::applied(next)
}

/// Append `block` to column `column` of the layout `layout_id`.
///
/// A missing column index means column 0; an out-of-range one is clamped
/// to 0. If `layout_id` is gone or is not a layout the block is appended
/// to the root forest instead, so an add aimed at a container that was
/// just deleted is not lost.
pub fn insert_into_column(forest: &Forest, layout_id: &str, column: Option<usize>, block: Block) -> Edit {
    let Some(location) = locate::locate(forest, layout_id) else {
        let reason = MutationError::LookupMiss(layout_id.into());
        return Edit::fallback(insert_top_level(forest, block).forest, reason);
    };

    let columns = match locate::block_at(forest, &location).map(Arc::as_ref) {
        Some(Block::Layout(layout)) => layout.children.len(),
        Some(other) => {
            let reason = MutationError::NotAContainer {
                id: other.id().clone(),
                kind: other.kind(),
            };
            return Edit::fallback(insert_top_level(forest, block).forest, reason);
        }
        None => {
            let reason = MutationError::LookupMiss(layout_id.into());
            return Edit::fallback(insert_top_level(forest, block).forest, reason);
        }
    };

    let requested = column.unwrap_or(0);
    if columns == 0 {
        // Only reachable with a hand-built layout that skipped normalization
        let reason = MutationError::InvalidColumnIndex {
            layout: layout_id.into(),
            column: requested,
            columns,
        };
        return Edit::fallback(insert_top_level(forest, block).forest, reason);
    }

    let (target, clamped) = if requested < columns {
        (requested, None)
    } else {
        let reason = MutationError::InvalidColumnIndex {
            layout: layout_id.into(),
            column: requested,
            columns,
        };
        (0, Some(reason))
    };

    debug_assert!(
        fresh_ids(forest, &block),
        "inserted block reuses an id already in the forest"
    );
    let mut next = forest.clone();
    let mut path = location.path;
    path.push(locate::Step { index: location.index, column: target });
    match locate::container_mut(&mut next, &path) {
        Some(container) => container.push(Arc::new(block)),
        None => {
            let reason = MutationError::LookupMiss(layout_id.into());
            return Edit::fallback(insert_top_level(forest, block).forest, reason);
        }
    }

    match clamped {
        Some(reason) => Edit::fallback(next, reason),
        None => Edit::applied(next),
    }
}

/// Remove the block with `id`; a layout takes its whole subtree with it
pub fn delete(forest: &Forest, id: &str) -> Edit {
    let Some(location) = locate::locate(forest, id) else {
        return Edit::noop(forest, MutationError::LookupMiss(id.into()));
    };

    let mut next = forest.clone();
    match locate::container_mut(&mut next, &location.path) {
        Some(container) => {
            container.remove(location.index);
            Edit::applied(next)
        }
        None => Edit::noop(forest, MutationError::LookupMiss(id.into())),
    }
}

/// Move `source_id` so it lands immediately before `target_id`
pub fn move_before(forest: &Forest, source_id: &str, target_id: &str) -> Edit {
    if source_id == target_id {
        return Edit::noop(forest, MutationError::MoveOntoSelf(source_id.into()));
    }

    let Some(source) = locate::locate(forest, source_id) else {
        return Edit::noop(forest, MutationError::LookupMiss(source_id.into()));
    };
    let Some(target) = locate::locate(forest, target_id) else {
        return Edit::noop(forest, MutationError::LookupMiss(target_id.into()));
    };

    // Re-inserting a layout into one of its own columns would detach it
    if target.is_within(&source) {
        return Edit::noop(
            forest,
            MutationError::MoveIntoOwnSubtree {
                source_id: source_id.into(),
                target_id: target_id.into(),
            },
        );
    }

    let mut next = forest.clone();
    let Some(moved) = take(&mut next, &source) else {
        return Edit::noop(forest, MutationError::LookupMiss(source_id.into()));
    };

    let mut insert_at = target.index;
    if source.container == target.container && source.index < target.index {
        insert_at -= 1;
    }

    // The target's container survives the removal (it is not inside the
    // source), but its route may have shifted, so resolve it by identity.
    let Some(path) = locate::resolve(&next, &target.container) else {
        return Edit::noop(forest, MutationError::LookupMiss(target_id.into()));
    };
    let Some(container) = locate::container_mut(&mut next, &path) else {
        return Edit::noop(forest, MutationError::LookupMiss(target_id.into()));
    };
    let insert_at = insert_at.min(container.len());
    container.insert(insert_at, moved);
    Edit::applied(next)
}

/// Move `source_id` to the end of the root forest (drop on empty canvas)
pub fn move_to_end(forest: &Forest, source_id: &str) -> Edit {
    let Some(source) = locate::locate(forest, source_id) else {
        return Edit::noop(forest, MutationError::LookupMiss(source_id.into()));
    };

    let mut next = forest.clone();
    match take(&mut next, &source) {
        Some(moved) => {
            next.slots_mut().push(moved);
            Edit::applied(next)
        }
        None => Edit::noop(forest, MutationError::LookupMiss(source_id.into())),
    }
}

/// Move `source_id` to the end of column `column` of `layout_id` (drop on
/// a column, which may be empty).
///
/// Column indexes follow `insert_into_column`: missing means 0, out of
/// range is clamped to 0 as a fallback. A vanished layout makes the whole
/// move a no-op, as does dropping a layout into its own columns.
pub fn move_into_column(forest: &Forest, source_id: &str, layout_id: &str, column: Option<usize>) -> Edit {
    let Some(source) = locate::locate(forest, source_id) else {
        return Edit::noop(forest, MutationError::LookupMiss(source_id.into()));
    };
    let Some(owner) = locate::locate(forest, layout_id) else {
        return Edit::noop(forest, MutationError::LookupMiss(layout_id.into()));
    };

    if source_id == layout_id || owner.is_within(&source) {
        return Edit::noop(
            forest,
            MutationError::MoveIntoOwnSubtree {
                source_id: source_id.into(),
                target_id: layout_id.into(),
            },
        );
    }

    let columns = match locate::block_at(forest, &owner).map(Arc::as_ref) {
        Some(Block::Layout(layout)) => layout.children.len(),
        Some(other) => {
            let reason = MutationError::NotAContainer {
                id: other.id().clone(),
                kind: other.kind(),
            };
            return Edit::noop(forest, reason);
        }
        None => return Edit::noop(forest, MutationError::LookupMiss(layout_id.into())),
    };

    let requested = column.unwrap_or(0);
    let invalid = MutationError::InvalidColumnIndex {
        layout: layout_id.into(),
        column: requested,
        columns,
    };
    if columns == 0 {
        return Edit::noop(forest, invalid);
    }
    let (target, clamped) = if requested < columns {
        (requested, None)
    } else {
        (0, Some(invalid))
    };

    let mut next = forest.clone();
    let Some(moved) = take(&mut next, &source) else {
        return Edit::noop(forest, MutationError::LookupMiss(source_id.into()));
    };

    // The layout is not inside the source, so it survived the removal;
    // only its route may have shifted.
    let container = ContainerRef::Column {
        layout: layout_id.into(),
        column: target,
    };
    let Some(path) = locate::resolve(&next, &container) else {
        return Edit::noop(forest, MutationError::LookupMiss(layout_id.into()));
    };
    let Some(slots) = locate::container_mut(&mut next, &path) else {
        return Edit::noop(forest, MutationError::LookupMiss(layout_id.into()));
    };
    slots.push(moved);

    match clamped {
        Some(reason) => Edit::fallback(next, reason),
        None => Edit::applied(next),
    }
}

fn take(forest: &mut Forest, location: &Location) -> Option<Arc<Block>> {
    let container = locate::container_mut(forest, &location.path)?;
    (location.index < container.len()).then(|| container.remove(location.index))
}

fn fresh_ids(forest: &Forest, block: &Block) -> bool {
    let incoming = Forest::from_blocks(vec![block.clone()]);
    incoming.ids().iter().all(|id| !forest.contains(id))
}
