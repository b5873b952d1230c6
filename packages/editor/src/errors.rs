//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Section is locked: {0}")]
    SectionLocked(String),

    #[error("Section cannot be deleted: {0}")]
    SectionNotDeletable(String),

    #[error("Document is not file-backed")]
    NotFileBacked,
}
