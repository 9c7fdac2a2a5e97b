//! Error taxonomy for the generation pipeline.
//!
//! Parse and store errors pass through unchanged so boundary callers can
//! match on the concrete failure. A fatal engine failure is wrapped with
//! the count of documents that completed before the abort.

use thiserror::Error;

use letterforge_pdf::PdfError;
use letterforge_sheet::ParseError;
use letterforge_store::StoreError;

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors surfaced at the service boundary
#[derive(Debug, Error)]
pub enum CoreError {
    /// Spreadsheet ingestion failed; the run never started
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Artifact storage or packaging failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The rendering engine itself went down mid-run
    #[error("Rendering engine failed after {completed} document(s): {source}")]
    EngineFailed {
        /// Documents completed before the abort
        completed: usize,
        #[source]
        source: PdfError,
    },

    /// Missing session file, artifact, or run
    #[error("Not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
