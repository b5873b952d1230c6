//! # Blocks
//!
//! The node type stored in a [`Forest`]. Four variants are leaves; `layout`
//! is the only container and owns one forest per column.
//!
//! The tree is acyclic by construction: blocks are either created fresh by
//! the constructors below or relocated by the mutation engine, never
//! aliased into a second container. Nothing checks this at runtime.

use crate::forest::Forest;
use crate::id::BlockId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const DEFAULT_TEXT: &str = "Enter your text here...";

/// A content block, discriminated by `type` in its serialized form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Rich text paragraph
    Text(TextBlock),

    /// Plain text heading
    Subheader(SubheaderBlock),

    /// Grid of captioned images
    ImageGrid(ImageGridBlock),

    /// Rows of string cells
    Table(TableBlock),

    /// Multi-column container
    Layout(LayoutBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub id: BlockId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubheaderBlock {
    pub id: BlockId,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGridBlock {
    pub id: BlockId,
    #[serde(default)]
    pub images: Vec<GridImage>,
    #[serde(default = "default_grid_columns")]
    pub grid_columns: u32,
}

/// One image slot inside a grid. `src` is an opaque reference (data URL,
/// handle); `None` means nothing has been uploaded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridImage {
    pub id: BlockId,
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub caption: String,
}

/// Rows of cells. All rows must have the same length; the edit helpers
/// keep it that way but a raw patch can break it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    pub id: BlockId,
    #[serde(default)]
    pub table_data: Vec<Vec<String>>,
}

/// Container block. `children.len()` always equals
/// `layout.column_count()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBlock {
    pub id: BlockId,
    #[serde(default)]
    pub layout: ColumnLayout,
    #[serde(default)]
    pub children: Vec<Forest>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnLayout {
    #[default]
    #[serde(rename = "1-col")]
    OneColumn,
    #[serde(rename = "2-col")]
    TwoColumns,
    #[serde(rename = "3-col")]
    ThreeColumns,
}

impl ColumnLayout {
    pub fn column_count(self) -> usize {
        match self {
            ColumnLayout::OneColumn => 1,
            ColumnLayout::TwoColumns => 2,
            ColumnLayout::ThreeColumns => 3,
        }
    }

    pub fn from_column_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(ColumnLayout::OneColumn),
            2 => Some(ColumnLayout::TwoColumns),
            3 => Some(ColumnLayout::ThreeColumns),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-col", self.column_count())
    }
}

impl FromStr for ColumnLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.trim_end_matches("-col").parse::<usize>().ok();
        count
            .and_then(ColumnLayout::from_column_count)
            .ok_or_else(|| format!("Unknown layout: {} (expected 1-col, 2-col or 3-col)", s))
    }
}

/// Block variant without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Text,
    Subheader,
    ImageGrid,
    Table,
    Layout,
}

impl BlockKind {
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Text,
        BlockKind::Subheader,
        BlockKind::ImageGrid,
        BlockKind::Table,
        BlockKind::Layout,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Subheader => "subheader",
            BlockKind::ImageGrid => "image_grid",
            BlockKind::Table => "table",
            BlockKind::Layout => "layout",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown block type: {}", s))
    }
}

fn default_grid_columns() -> u32 {
    1
}

impl Block {
    /// Create a block of the given kind with a fresh id and default content
    pub fn new(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => Self::text(),
            BlockKind::Subheader => Self::subheader(),
            BlockKind::ImageGrid => Self::image_grid(),
            BlockKind::Table => Self::table(),
            BlockKind::Layout => Self::layout(),
        }
    }

    pub fn text() -> Self {
        Block::Text(TextBlock {
            id: BlockId::generate("block"),
            content: DEFAULT_TEXT.to_string(),
            placeholder: None,
        })
    }

    pub fn subheader() -> Self {
        Block::Subheader(SubheaderBlock {
            id: BlockId::generate("block"),
            content: DEFAULT_TEXT.to_string(),
            placeholder: Some(DEFAULT_TEXT.to_string()),
        })
    }

    pub fn image_grid() -> Self {
        Block::ImageGrid(ImageGridBlock {
            id: BlockId::generate("block"),
            images: vec![GridImage::empty()],
            grid_columns: 1,
        })
    }

    pub fn table() -> Self {
        let row = |a: &str, b: &str| vec![a.to_string(), b.to_string()];
        Block::Table(TableBlock {
            id: BlockId::generate("block"),
            table_data: vec![row("Header 1", "Header 2"), row("Data 1", "Data 2")],
        })
    }

    pub fn layout() -> Self {
        Self::layout_with(ColumnLayout::OneColumn)
    }

    /// Layout block with `layout.column_count()` empty columns
    pub fn layout_with(layout: ColumnLayout) -> Self {
        Block::Layout(LayoutBlock {
            id: BlockId::generate("block"),
            layout,
            children: vec![Forest::new(); layout.column_count()],
        })
    }

    pub fn id(&self) -> &BlockId {
        match self {
            Block::Text(b) => &b.id,
            Block::Subheader(b) => &b.id,
            Block::ImageGrid(b) => &b.id,
            Block::Table(b) => &b.id,
            Block::Layout(b) => &b.id,
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Text(_) => BlockKind::Text,
            Block::Subheader(_) => BlockKind::Subheader,
            Block::ImageGrid(_) => BlockKind::ImageGrid,
            Block::Table(_) => BlockKind::Table,
            Block::Layout(_) => BlockKind::Layout,
        }
    }

    /// Column forests if this is a container
    pub fn columns(&self) -> Option<&[Forest]> {
        match self {
            Block::Layout(layout) => Some(&layout.children),
            _ => None,
        }
    }

    pub fn as_layout(&self) -> Option<&LayoutBlock> {
        match self {
            Block::Layout(layout) => Some(layout),
            _ => None,
        }
    }
}

impl GridImage {
    pub fn empty() -> Self {
        Self {
            id: BlockId::generate("img"),
            src: None,
            caption: String::new(),
        }
    }
}

impl LayoutBlock {
    /// Truncate or pad `children` so it matches the column count.
    /// Returns true if anything changed.
    pub fn fit_columns(&mut self) -> bool {
        let count = self.layout.column_count();
        if self.children.len() == count {
            return false;
        }
        self.children.resize_with(count, Forest::new);
        true
    }
}
