//! # Folio Model
//!
//! The block-tree document model behind the folio report editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ block / id: tagged-union nodes, fresh ids   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ forest: ordered Arc<Block> sequences        │
//! │ locate: id → (container, index)             │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ mutate: update / insert / delete / move     │
//! │  - input forest never modified              │
//! │  - only the touched route is copied         │
//! │  - stale ids are no-ops, never failures     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Strict tree**: no parent pointers; a block's position is the
//!    container holding it and its index there
//! 2. **Ids are forever**: minted once, carried by moves, never reused
//! 3. **Persistent updates**: every mutation returns a new forest that
//!    shares untouched branches with the old one
//!
//! ## Usage
//!
//! ```rust
//! use folio_model::{mutate, Block, Forest};
//!
//! let a = Block::text();
//! let b = Block::table();
//! let (a_id, b_id) = (a.id().clone(), b.id().clone());
//! let forest = Forest::from_blocks(vec![a, b]);
//!
//! let moved = mutate::move_before(&forest, b_id.as_str(), a_id.as_str()).into_forest();
//! assert_eq!(moved.root_ids(), vec![b_id.as_str(), a_id.as_str()]);
//! ```

pub mod block;
pub mod edits;
pub mod forest;
pub mod id;
pub mod locate;
pub mod mutate;
pub mod patch;
pub mod visitor;

pub use block::{
    Block, BlockKind, ColumnLayout, GridImage, ImageGridBlock, LayoutBlock, SubheaderBlock, TableBlock, TextBlock,
};
pub use forest::Forest;
pub use id::BlockId;
pub use locate::{locate, ContainerRef, Location};
pub use mutate::{Edit, Mutation, MutationError, Outcome};
pub use patch::{BlockPatch, ImageGridPatch, LayoutPatch, SubheaderPatch, TablePatch, TextPatch};
pub use visitor::{TreeStats, Visitor};
