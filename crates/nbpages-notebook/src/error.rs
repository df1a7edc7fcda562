//! Error types for notebook loading.

/// Error returned when a notebook cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// The notebook file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or lacks a required structural key
    /// (`cells`, `cell_type`, `source`, `outputs`, ...).
    #[error("Invalid notebook format: {0}")]
    Format(#[from] serde_json::Error),
}
