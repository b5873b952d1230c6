use crate::block::{Block, LayoutBlock};
use crate::forest::Forest;

/// Visitor pattern for traversing a block tree immutably
///
/// The default implementations walk the whole tree in document order:
/// pre-order, layout columns left to right. Override specific visit_*
/// methods to act on nodes; call the matching walk_* function to keep
/// descending.
pub trait Visitor: Sized {
    fn visit_forest(&mut self, forest: &Forest) {
        walk_forest(self, forest);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_column(&mut self, layout: &LayoutBlock, column: usize, forest: &Forest) {
        let _ = (layout, column);
        walk_forest(self, forest);
    }
}

pub fn walk_forest<V: Visitor>(visitor: &mut V, forest: &Forest) {
    for block in forest.iter() {
        visitor.visit_block(block);
    }
}

pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    if let Block::Layout(layout) = block {
        for (column, forest) in layout.children.iter().enumerate() {
            visitor.visit_column(layout, column, forest);
        }
    }
}

/// Collects block ids in document order
#[derive(Debug, Default)]
pub struct IdCollector {
    pub ids: Vec<String>,
}

impl Visitor for IdCollector {
    fn visit_block(&mut self, block: &Block) {
        self.ids.push(block.id().to_string());
        walk_block(self, block);
    }
}

/// Tallies blocks per kind and the deepest layout nesting seen
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TreeStats {
    pub text: usize,
    pub subheader: usize,
    pub image_grid: usize,
    pub table: usize,
    pub layout: usize,
    pub max_depth: usize,
    depth: usize,
}

impl TreeStats {
    pub fn of(forest: &Forest) -> Self {
        let mut stats = Self::default();
        stats.visit_forest(forest);
        stats
    }

    pub fn total(&self) -> usize {
        self.text + self.subheader + self.image_grid + self.table + self.layout
    }
}

impl Visitor for TreeStats {
    fn visit_block(&mut self, block: &Block) {
        match block {
            Block::Text(_) => self.text += 1,
            Block::Subheader(_) => self.subheader += 1,
            Block::ImageGrid(_) => self.image_grid += 1,
            Block::Table(_) => self.table += 1,
            Block::Layout(_) => self.layout += 1,
        }
        walk_block(self, block);
    }

    fn visit_column(&mut self, _layout: &LayoutBlock, _column: usize, forest: &Forest) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        walk_forest(self, forest);
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::ColumnLayout;

    #[test]
    fn test_tree_stats() {
        let mut inner = Block::layout_with(ColumnLayout::TwoColumns);
        if let Block::Layout(layout) = &mut inner {
            layout.children[1] = Forest::from_blocks(vec![Block::table(), Block::text()]);
        }
        let mut outer = Block::layout();
        if let Block::Layout(layout) = &mut outer {
            layout.children[0] = Forest::from_blocks(vec![inner, Block::image_grid()]);
        }
        let forest = Forest::from_blocks(vec![Block::subheader(), outer]);

        let stats = TreeStats::of(&forest);
        assert_eq!(stats.layout, 2);
        assert_eq!(stats.table, 1);
        assert_eq!(stats.text, 1);
        assert_eq!(stats.image_grid, 1);
        assert_eq!(stats.subheader, 1);
        assert_eq!(stats.total(), 6);
        assert_eq!(stats.max_depth, 2);
    }
}
