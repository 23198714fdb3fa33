//! Error types for LSF parsing.

use thiserror::Error;

/// Errors that can occur when decoding LSF files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] tachie_common::Error),

    /// Invalid file extension.
    #[error("invalid file extension: expected {expected}, got {actual}")]
    InvalidExtension { expected: String, actual: String },

    /// Buffer too small to hold the fixed header.
    #[error("LSF header truncated: expected at least {expected} bytes, got {actual}")]
    HeaderTooShort { expected: usize, actual: usize },

    /// Buffer too small for the declared record table.
    #[error("LSF record table truncated: {entries} entries need {needed} bytes, got {available}")]
    Truncated {
        entries: usize,
        needed: usize,
        available: usize,
    },
}

impl Error {
    /// Whether the error comes from malformed or truncated input rather than I/O.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::Common(_) | Error::HeaderTooShort { .. } | Error::Truncated { .. }
        )
    }
}

/// Result type for LSF operations.
pub type Result<T> = std::result::Result<T, Error>;
