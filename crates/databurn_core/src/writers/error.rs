//! Export error types.

use std::path::PathBuf;

/// Errors that can occur while writing an editorial list.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Destination could not be created or written.
    #[error("Failed to write file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
