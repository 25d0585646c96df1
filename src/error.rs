//! Error types for region editing.

use thiserror::Error;

/// Errors surfaced by the region store, the command processor and the
/// annotation bridge. A failed operation never leaves partial state behind.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Region not found: {id}")]
    NotFound { id: String },

    #[error("Invalid interval: [{start}, {end}]")]
    InvalidInterval { start: f64, end: f64 },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unsupported command '{0}'")]
    UnsupportedCommand(String),

    #[error("Import rejected: {0}")]
    ImportValidation(String),

    #[error("RTTM line {line}: {reason}")]
    Rttm { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EditorError>;
