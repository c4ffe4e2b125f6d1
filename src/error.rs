//! Error taxonomy for taskmate operations.
//!
//! Validation and not-found conditions are deterministic and recoverable
//! by the caller; store failures are logged and surfaced without retry.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed caller input (empty title, missing range bounds).
    #[error("{0}")]
    Validation(String),

    /// The row is absent or not owned by the calling user.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// A due/reminder value that could not be parsed. Rejected before any
    /// normalization or persistence.
    #[error("invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("failed to create database directory: {0}")]
    Directory(String),
}

impl Error {
    pub fn not_found(kind: &'static str, id: i64) -> Self {
        Error::NotFound { kind, id }
    }
}

/// Result type alias for taskmate operations
pub type Result<T> = std::result::Result<T, Error>;
