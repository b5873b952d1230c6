//! # Forest
//!
//! An ordered sequence of blocks: a section's root, or one column of a
//! layout block.
//!
//! Blocks are held behind `Arc` so a mutated forest can share every branch
//! it did not touch with the forest it was derived from. Equality is
//! structural (it compares block values, not pointers).

use crate::block::Block;
use crate::visitor::{IdCollector, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest(Vec<Arc<Block>>);

impl Forest {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        Self(blocks.into_iter().map(Arc::new).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Block> {
        self.0.get(index).map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.0.iter().map(Arc::as_ref)
    }

    pub fn as_slice(&self) -> &[Arc<Block>] {
        &self.0
    }

    pub(crate) fn slots_mut(&mut self) -> &mut Vec<Arc<Block>> {
        &mut self.0
    }

    /// Ids of the root blocks, in order
    pub fn root_ids(&self) -> Vec<&str> {
        self.iter().map(|block| block.id().as_str()).collect()
    }

    /// Find a block anywhere in the tree
    pub fn find(&self, id: &str) -> Option<&Block> {
        crate::locate::locate(self, id)
            .and_then(|location| crate::locate::block_at(self, &location))
            .map(Arc::as_ref)
    }

    pub fn contains(&self, id: &str) -> bool {
        crate::locate::locate(self, id).is_some()
    }

    /// Every block id in document order (pre-order, columns left to right)
    pub fn ids(&self) -> Vec<String> {
        let mut collector = IdCollector::default();
        collector.visit_forest(self);
        collector.ids
    }

    pub fn block_count(&self) -> usize {
        self.ids().len()
    }

    /// Ids that occur more than once. Empty for any forest built through
    /// the mutation engine; only hand-edited input can trip it.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for id in self.ids() {
            if !seen.insert(id.clone()) && !duplicates.contains(&id) {
                duplicates.push(id);
            }
        }
        duplicates
    }

    /// Resize every layout's columns to match its column count.
    /// Returns the number of layouts that had to be fixed.
    pub fn normalize(&mut self) -> usize {
        let mut fixed = 0;
        for slot in self.0.iter_mut() {
            if slot.as_layout().is_none() {
                continue;
            }
            if let Block::Layout(layout) = Arc::make_mut(slot) {
                if layout.fit_columns() {
                    fixed += 1;
                }
                for column in layout.children.iter_mut() {
                    fixed += column.normalize();
                }
            }
        }
        fixed
    }

    /// True if both forests hold the very same allocation for `id`,
    /// i.e. the block was shared rather than copied between them.
    pub fn shares_block(&self, other: &Forest, id: &str) -> bool {
        let find = |forest: &Forest| {
            crate::locate::locate(forest, id)
                .and_then(|location| crate::locate::block_at(forest, &location).cloned())
        };
        match (find(self), find(other)) {
            (Some(a), Some(b)) => Arc::ptr_eq(&a, &b),
            _ => false,
        }
    }
}

impl FromIterator<Block> for Forest {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self::from_blocks(iter)
    }
}
