//! # Tree Locator
//!
//! Finds the container that owns a block and the block's index inside it.
//! Blocks carry no parent pointer; ownership is purely positional, so this
//! search is the single source of truth for "where is this block".
//!
//! Containers are identified by [`ContainerRef`], which names the owning
//! layout by id rather than by position. Two locations are in the same
//! container exactly when their `ContainerRef`s are equal, and a
//! `ContainerRef` stays valid when blocks elsewhere in the tree shift.

use crate::block::Block;
use crate::forest::Forest;
use crate::id::BlockId;
use std::sync::Arc;

/// Identity of an ordered block container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerRef {
    /// The section's top-level forest
    Root,

    /// One column of a layout block
    Column { layout: BlockId, column: usize },
}

/// Where a block sits: its container and its index within it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub container: ContainerRef,
    pub index: usize,
    /// Positional route from the root to `container`
    pub(crate) path: Vec<Step>,
}

/// One hop down the tree: the layout at `index`, then its `column`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Step {
    pub index: usize,
    pub column: usize,
}

impl Location {
    /// Nesting depth of the container (0 for the root forest)
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// True if `self` lies somewhere inside the subtree of the block at
    /// `ancestor` (the block itself excluded)
    pub fn is_within(&self, ancestor: &Location) -> bool {
        let depth = ancestor.path.len();
        self.path.len() > depth
            && self.path[..depth] == ancestor.path[..]
            && self.path[depth].index == ancestor.index
    }
}

/// Depth-first search for `target`. Returns the first match in document
/// order; ids are unique so it is also the only one.
pub fn locate(forest: &Forest, target: &str) -> Option<Location> {
    let mut path = Vec::new();
    locate_in(forest.as_slice(), target, None, &mut path)
}

fn locate_in(
    blocks: &[Arc<Block>],
    target: &str,
    owner: Option<(&BlockId, usize)>,
    path: &mut Vec<Step>,
) -> Option<Location> {
    for (index, block) in blocks.iter().enumerate() {
        if block.id() == target {
            let container = match owner {
                None => ContainerRef::Root,
                Some((layout, column)) => ContainerRef::Column {
                    layout: layout.clone(),
                    column,
                },
            };
            return Some(Location {
                container,
                index,
                path: path.clone(),
            });
        }

        if let Block::Layout(layout) = block.as_ref() {
            for (column, forest) in layout.children.iter().enumerate() {
                path.push(Step { index, column });
                let found = locate_in(forest.as_slice(), target, Some((&layout.id, column)), path);
                path.pop();
                if found.is_some() {
                    return found;
                }
            }
        }
    }

    None
}

/// The block slot a location points at
pub fn block_at<'a>(forest: &'a Forest, location: &Location) -> Option<&'a Arc<Block>> {
    container_at(forest, &location.path)?.get(location.index)
}

/// Route to a container, if it still exists in `forest`
pub(crate) fn resolve(forest: &Forest, container: &ContainerRef) -> Option<Vec<Step>> {
    match container {
        ContainerRef::Root => Some(Vec::new()),
        ContainerRef::Column { layout, column } => {
            let location = locate(forest, layout.as_str())?;
            let owner = block_at(forest, &location)?.as_layout()?;
            if *column >= owner.children.len() {
                return None;
            }
            let mut path = location.path;
            path.push(Step {
                index: location.index,
                column: *column,
            });
            Some(path)
        }
    }
}

fn container_at<'a>(forest: &'a Forest, path: &[Step]) -> Option<&'a [Arc<Block>]> {
    let mut blocks = forest.as_slice();
    for step in path {
        let layout = blocks.get(step.index)?.as_layout()?;
        blocks = layout.children.get(step.column)?.as_slice();
    }
    Some(blocks)
}

/// Mutable access to a container, copying every block along the route
/// that is still shared with another forest. Blocks off the route are
/// left shared.
pub(crate) fn container_mut<'a>(forest: &'a mut Forest, path: &[Step]) -> Option<&'a mut Vec<Arc<Block>>> {
    let mut blocks = forest.slots_mut();
    for step in path {
        let slot = blocks.get_mut(step.index)?;
        match Arc::make_mut(slot) {
            Block::Layout(layout) => {
                blocks = layout.children.get_mut(step.column)?.slots_mut();
            }
            _ => return None,
        }
    }
    Some(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ColumnLayout, LayoutBlock, TextBlock};

    fn text(id: &str) -> Block {
        Block::Text(TextBlock {
            id: BlockId::from(id),
            content: String::new(),
            placeholder: None,
        })
    }

    fn layout(id: &str, children: Vec<Vec<Block>>) -> Block {
        let layout = ColumnLayout::from_column_count(children.len()).unwrap();
        Block::Layout(LayoutBlock {
            id: BlockId::from(id),
            layout,
            children: children.into_iter().map(Forest::from_blocks).collect(),
        })
    }

    fn sample() -> Forest {
        Forest::from_blocks(vec![
            text("a"),
            layout(
                "l1",
                vec![vec![text("b"), text("c")], vec![layout("l2", vec![vec![text("d")]])]],
            ),
            text("e"),
        ])
    }

    #[test]
    fn test_locate_root_block() {
        let forest = sample();
        let location = locate(&forest, "e").unwrap();
        assert_eq!(location.container, ContainerRef::Root);
        assert_eq!(location.index, 2);
        assert_eq!(location.depth(), 0);
    }

    #[test]
    fn test_locate_nested_block() {
        let forest = sample();
        let location = locate(&forest, "c").unwrap();
        assert_eq!(
            location.container,
            ContainerRef::Column { layout: BlockId::from("l1"), column: 0 }
        );
        assert_eq!(location.index, 1);

        let deep = locate(&forest, "d").unwrap();
        assert_eq!(
            deep.container,
            ContainerRef::Column { layout: BlockId::from("l2"), column: 0 }
        );
        assert_eq!(deep.depth(), 2);
        assert_eq!(block_at(&forest, &deep).unwrap().id(), "d");
    }

    #[test]
    fn test_locate_every_id() {
        let forest = sample();
        for id in forest.ids() {
            let location = locate(&forest, &id).unwrap();
            assert_eq!(block_at(&forest, &location).unwrap().id().as_str(), id);
        }
    }

    #[test]
    fn test_locate_missing() {
        assert!(locate(&sample(), "zzz").is_none());
        assert!(locate(&Forest::new(), "a").is_none());
    }

    #[test]
    fn test_is_within() {
        let forest = sample();
        let l1 = locate(&forest, "l1").unwrap();
        let d = locate(&forest, "d").unwrap();
        let e = locate(&forest, "e").unwrap();
        assert!(d.is_within(&l1));
        assert!(!l1.is_within(&l1));
        assert!(!e.is_within(&l1));
        assert!(!l1.is_within(&d));
    }

    #[test]
    fn test_resolve_column() {
        let forest = sample();
        let container = ContainerRef::Column { layout: BlockId::from("l2"), column: 0 };
        assert_eq!(resolve(&forest, &container).unwrap().len(), 2);

        let out_of_range = ContainerRef::Column { layout: BlockId::from("l2"), column: 5 };
        assert!(resolve(&forest, &out_of_range).is_none());

        let not_a_layout = ContainerRef::Column { layout: BlockId::from("a"), column: 0 };
        assert!(resolve(&forest, &not_a_layout).is_none());
    }

    #[test]
    fn test_container_mut_copies_only_the_route() {
        let original = sample();
        let mut copy = original.clone();
        let path = resolve(&copy, &ContainerRef::Column { layout: BlockId::from("l2"), column: 0 }).unwrap();
        container_mut(&mut copy, &path).unwrap().push(Arc::new(text("f")));

        assert!(!original.contains("f"));
        assert!(copy.contains("f"));
        assert!(copy.shares_block(&original, "a"));
        assert!(copy.shares_block(&original, "b"));
        assert!(!copy.shares_block(&original, "l1"));
        assert!(!copy.shares_block(&original, "l2"));
    }
}
