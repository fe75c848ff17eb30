use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool reads a workbook or writes the translation tree.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the spreadsheet reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::Error),

    /// Raised when a workbook cannot be interpreted at all.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a tree mapping file contains an unusable entry.
    #[error("invalid tree mapping in {path}: {reason}")]
    InvalidMapping { path: PathBuf, reason: String },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
