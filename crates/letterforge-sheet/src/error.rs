//! Error types for spreadsheet ingestion.

use thiserror::Error;

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing an uploaded spreadsheet
#[derive(Debug, Error)]
pub enum ParseError {
    /// File extension is not one of the accepted spreadsheet formats
    #[error("Unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    /// The sheet has no data rows (header-only or blank)
    #[error("The sheet contains no data rows")]
    EmptyFile,

    /// The file content could not be decoded as the claimed format
    #[error("Corrupt or unreadable spreadsheet: {0}")]
    Corrupt(String),
}

impl From<calamine::Error> for ParseError {
    fn from(err: calamine::Error) -> Self {
        ParseError::Corrupt(err.to_string())
    }
}

impl From<calamine::XlsxError> for ParseError {
    fn from(err: calamine::XlsxError) -> Self {
        ParseError::Corrupt(err.to_string())
    }
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        ParseError::Corrupt(err.to_string())
    }
}
