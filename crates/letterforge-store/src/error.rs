//! Error types for artifact storage.

use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during artifact storage and packaging
#[derive(Debug, Error)]
pub enum StoreError {
    /// No artifact with that name in the current run
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// Artifact name attempts to escape the managed directory
    #[error("Artifact name rejected (path violation): {0}")]
    PathViolation(String),

    /// Saving was attempted before a run was started
    #[error("No active run; call reset() first")]
    NoActiveRun,

    /// Zip packaging error
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
