//! # Folio Editor
//!
//! Section store, drag gestures and persistence for folio reports.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ folio-model: blocks, forests, mutations     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: sections and their forests          │
//! │  - one forest per section, replaced whole   │
//! │  - subscribers notified on every replace    │
//! │  - drag gestures turned into move mutations │
//! │  - {reportData, sections} JSON on disk      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ host UI / folio CLI                         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{EditSession, Intent, ReportDocument, INITIAL_SECTION_ID};
//! use folio_model::BlockKind;
//!
//! let mut session = EditSession::new("local", ReportDocument::new("Findings"));
//! let change = session
//!     .dispatch(Intent::AddBlock {
//!         section: INITIAL_SECTION_ID.to_string(),
//!         kind: BlockKind::Table,
//!         container_id: None,
//!         column_index: None,
//!     })
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(change.forest.len(), 2);
//! ```

pub mod document;
pub mod drag;
pub mod errors;
pub mod recent;
pub mod session;
pub mod store;

pub use document::{ReportDocument, ReportFile};
pub use drag::DragState;
pub use errors::EditorError;
pub use recent::{RecentReport, RecentReports};
pub use session::{EditSession, Intent};
pub use store::{AppliedMutation, DocumentStore, ForestChanged, Section, SectionId, INITIAL_SECTION_ID};
