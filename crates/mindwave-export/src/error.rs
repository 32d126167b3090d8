//! Error types for mindwave-export

use std::io;
use thiserror::Error;

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Format string not recognised
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid export options or request parameters
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Encoding error (size overflow, allocation failure)
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Export thread failure
    #[error("Render error: {0}")]
    Render(String),

    /// Invalid audio data
    #[error("Invalid audio data: {0}")]
    InvalidData(String),

    /// Loop recorder misuse
    #[error("Capture error: {0}")]
    Capture(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

impl From<std::collections::TryReserveError> for ExportError {
    fn from(e: std::collections::TryReserveError) -> Self {
        ExportError::Encoding(format!("buffer allocation failed: {e}"))
    }
}
