//! Error types for PDF rendering

use thiserror::Error;

/// Result type for rendering operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Errors that can occur while rendering letters
#[derive(Error, Debug)]
pub enum PdfError {
    /// The rendering engine could not be started; fatal for the whole run
    #[error("Rendering engine unavailable: {0}")]
    EngineUnavailable(String),

    /// One document failed to compile; the batch continues
    #[error("Typst compilation failed: {0}")]
    Compilation(String),
}

impl PdfError {
    /// Whether this error aborts the whole run rather than a single row
    pub fn is_fatal(&self) -> bool {
        matches!(self, PdfError::EngineUnavailable(_))
    }
}
