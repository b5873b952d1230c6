//! # Block Patches
//!
//! A patch mirrors one [`Block`] variant with every field optional.
//! Applying it shallow-merges the present fields into a block of the same
//! variant. A patch for another variant is rejected whole and the block is
//! left as it was; a patch can never change a block's type or id.

use crate::block::{Block, BlockKind, ColumnLayout, GridImage};
use crate::forest::Forest;
use crate::mutate::MutationError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockPatch {
    Text(TextPatch),
    Subheader(SubheaderPatch),
    ImageGrid(ImageGridPatch),
    Table(TablePatch),
    Layout(LayoutPatch),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubheaderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGridPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<GridImage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_columns: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_data: Option<Vec<Vec<String>>>,
}

/// Changing `layout` without `children` keeps the existing columns that
/// still fit and pads with empty ones. Supplied `children` are fitted to
/// the resulting column count the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<ColumnLayout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Forest>>,
}

impl BlockPatch {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockPatch::Text(_) => BlockKind::Text,
            BlockPatch::Subheader(_) => BlockKind::Subheader,
            BlockPatch::ImageGrid(_) => BlockKind::ImageGrid,
            BlockPatch::Table(_) => BlockKind::Table,
            BlockPatch::Layout(_) => BlockKind::Layout,
        }
    }

    /// Patch that replaces the content of a text or subheader block
    pub fn content(kind: BlockKind, content: impl Into<String>) -> Option<Self> {
        let content = Some(content.into());
        match kind {
            BlockKind::Text => Some(BlockPatch::Text(TextPatch { content, placeholder: None })),
            BlockKind::Subheader => Some(BlockPatch::Subheader(SubheaderPatch { content, placeholder: None })),
            _ => None,
        }
    }

    /// Ids that would occur more than once after merging this patch into
    /// block `id` of `forest`. Only wholesale `children` and `images`
    /// lists can bring ids in; ids already under the patched block may be
    /// supplied again.
    pub fn duplicated_ids(&self, forest: &Forest, id: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        match self {
            BlockPatch::Layout(LayoutPatch {
                children: Some(children), ..
            }) => {
                let own: HashSet<String> = forest
                    .find(id)
                    .map(|block| Forest::from_blocks(vec![block.clone()]).ids())
                    .unwrap_or_default()
                    .into_iter()
                    .collect();
                children
                    .iter()
                    .flat_map(Forest::ids)
                    .filter(|child| !seen.insert(child.clone()) || (forest.contains(child) && !own.contains(child)))
                    .collect()
            }
            BlockPatch::ImageGrid(ImageGridPatch { images: Some(images), .. }) => images
                .iter()
                .map(|image| image.id.as_str().to_string())
                .filter(|image| !seen.insert(image.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Merge this patch into `block` in place
    pub fn apply_to(&self, block: &mut Block) -> Result<(), MutationError> {
        match (block, self) {
            (Block::Text(b), BlockPatch::Text(p)) => {
                merge(&mut b.content, &p.content);
                merge_opt(&mut b.placeholder, &p.placeholder);
            }
            (Block::Subheader(b), BlockPatch::Subheader(p)) => {
                merge(&mut b.content, &p.content);
                merge_opt(&mut b.placeholder, &p.placeholder);
            }
            (Block::ImageGrid(b), BlockPatch::ImageGrid(p)) => {
                merge(&mut b.images, &p.images);
                if let Some(columns) = p.grid_columns {
                    b.grid_columns = columns.max(1);
                }
            }
            (Block::Table(b), BlockPatch::Table(p)) => {
                merge(&mut b.table_data, &p.table_data);
            }
            (Block::Layout(b), BlockPatch::Layout(p)) => {
                merge(&mut b.layout, &p.layout);
                merge(&mut b.children, &p.children);
                b.fit_columns();
            }
            (block, patch) => {
                return Err(MutationError::StructuralMismatch {
                    id: block.id().clone(),
                    expected: block.kind(),
                    found: patch.kind(),
                });
            }
        }
        Ok(())
    }
}

fn merge<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

fn merge_opt<T: Clone>(field: &mut Option<T>, value: &Option<T>) {
    if value.is_some() {
        field.clone_from(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_patch_merges_present_fields() {
        let mut block = Block::text();
        let id = block.id().clone();
        let patch = BlockPatch::content(BlockKind::Text, "Hello").unwrap();
        patch.apply_to(&mut block).unwrap();

        match &block {
            Block::Text(text) => {
                assert_eq!(text.content, "Hello");
                assert_eq!(text.placeholder, None);
                assert_eq!(text.id, id);
            }
            other => panic!("Expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_patch_is_rejected_whole() {
        let mut block = Block::table();
        let before = block.clone();
        let patch = BlockPatch::content(BlockKind::Text, "nope").unwrap();

        let err = patch.apply_to(&mut block).unwrap_err();
        assert_eq!(
            err,
            MutationError::StructuralMismatch {
                id: before.id().clone(),
                expected: BlockKind::Table,
                found: BlockKind::Text,
            }
        );
        assert_eq!(block, before);
    }

    #[test]
    fn test_layout_patch_keeps_retained_columns() {
        let mut block = Block::layout_with(ColumnLayout::ThreeColumns);
        if let Block::Layout(layout) = &mut block {
            layout.children[0] = Forest::from_blocks(vec![Block::text()]);
            layout.children[2] = Forest::from_blocks(vec![Block::table()]);
        }

        let shrink = BlockPatch::Layout(LayoutPatch {
            layout: Some(ColumnLayout::TwoColumns),
            children: None,
        });
        shrink.apply_to(&mut block).unwrap();
        let layout = block.as_layout().unwrap();
        assert_eq!(layout.children.len(), 2);
        assert_eq!(layout.children[0].len(), 1);
        assert!(layout.children[1].is_empty());

        let grow = BlockPatch::Layout(LayoutPatch {
            layout: Some(ColumnLayout::ThreeColumns),
            children: None,
        });
        grow.apply_to(&mut block).unwrap();
        let layout = block.as_layout().unwrap();
        assert_eq!(layout.children.len(), 3);
        assert_eq!(layout.children[0].len(), 1);
        assert!(layout.children[2].is_empty());
    }

    #[test]
    fn test_layout_patch_fits_supplied_children() {
        let mut block = Block::layout();
        let patch = BlockPatch::Layout(LayoutPatch {
            layout: None,
            children: Some(vec![Forest::new(), Forest::new(), Forest::new()]),
        });
        patch.apply_to(&mut block).unwrap();
        assert_eq!(block.as_layout().unwrap().children.len(), 1);
    }

    #[test]
    fn test_grid_columns_clamped() {
        let mut block = Block::image_grid();
        let patch = BlockPatch::ImageGrid(ImageGridPatch {
            images: None,
            grid_columns: Some(0),
        });
        patch.apply_to(&mut block).unwrap();
        match block {
            Block::ImageGrid(grid) => assert_eq!(grid.grid_columns, 1),
            other => panic!("Expected image grid, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicated_ids_in_wholesale_lists() {
        let sibling = Block::text();
        let child = Block::text();
        let mut layout = Block::layout();
        if let Block::Layout(l) = &mut layout {
            l.children[0] = Forest::from_blocks(vec![child.clone()]);
        }
        let layout_id = layout.id().as_str().to_string();
        let forest = Forest::from_blocks(vec![layout, sibling.clone()]);

        let reshuffle = BlockPatch::Layout(LayoutPatch {
            layout: None,
            children: Some(vec![Forest::from_blocks(vec![child.clone()])]),
        });
        assert!(reshuffle.duplicated_ids(&forest, &layout_id).is_empty());

        let steal = BlockPatch::Layout(LayoutPatch {
            layout: None,
            children: Some(vec![Forest::from_blocks(vec![child, sibling.clone()])]),
        });
        assert_eq!(steal.duplicated_ids(&forest, &layout_id), vec![sibling.id().as_str()]);

        let image = GridImage {
            id: "img-1".into(),
            src: None,
            caption: String::new(),
        };
        let images = BlockPatch::ImageGrid(ImageGridPatch {
            images: Some(vec![image.clone(), image]),
            grid_columns: None,
        });
        assert_eq!(images.duplicated_ids(&forest, "grid"), vec!["img-1"]);
    }

    #[test]
    fn test_patch_json_shape() {
        let json = r#"{ "type": "table", "tableData": [["x"]] }"#;
        let patch: BlockPatch = serde_json::from_str(json).unwrap();
        assert_eq!(
            patch,
            BlockPatch::Table(TablePatch {
                table_data: Some(vec![vec!["x".to_string()]]),
            })
        );
    }
}
