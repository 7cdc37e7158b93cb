//! Error types for index construction and lookup.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`IndexError`] enum. Lookup misses are not errors: they are reported through
//! a sentinel value or `None`.
//!
//! # Examples
//!
//! ```
//! use barrel_index::error::{IndexError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(IndexError::invalid_argument("barrel count must be positive"))
//! }
//!
//! assert!(example_operation().is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for index operations.
#[derive(Error, Debug)]
pub enum IndexError {
    /// A file required for reading could not be opened.
    #[error("Missing file: {0}")]
    MissingFile(String),

    /// A key (document id, numeric document id) is already indexed.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// A lookup target could not be resolved where resolution is mandatory.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal invariant was violated, e.g. a reverse-lexicon id collision.
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),

    /// Binary input ended early or was malformed.
    #[error("Corrupt data: {0}")]
    Corrupt(String),

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid operation for the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors (failed writes, unexpected read failures)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for operations that may fail with IndexError.
pub type Result<T> = std::result::Result<T, IndexError>;

impl IndexError {
    /// Create a new missing file error.
    pub fn missing_file<S: Into<String>>(name: S) -> Self {
        IndexError::MissingFile(name.into())
    }

    /// Create a new duplicate key error.
    pub fn duplicate_key<S: Into<String>>(key: S) -> Self {
        IndexError::DuplicateKey(key.into())
    }

    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        IndexError::NotFound(msg.into())
    }

    /// Create a new inconsistent state error.
    pub fn inconsistent_state<S: Into<String>>(msg: S) -> Self {
        IndexError::InconsistentState(msg.into())
    }

    /// Create a new corrupt data error.
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        IndexError::Corrupt(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        IndexError::InvalidArgument(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        IndexError::InvalidConfig(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        IndexError::InvalidOperation(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        IndexError::Storage(msg.into())
    }

    /// True for errors that describe a skipped item rather than a failed
    /// operation.
    pub fn is_skippable(&self) -> bool {
        matches!(self, IndexError::DuplicateKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = IndexError::duplicate_key("doc-1");
        assert_eq!(error.to_string(), "Duplicate key: doc-1");

        let error = IndexError::inconsistent_state("id 3 claimed twice");
        assert_eq!(error.to_string(), "Inconsistent state: id 3 claimed twice");

        let error = IndexError::missing_file("lexicon.csv");
        assert_eq!(error.to_string(), "Missing file: lexicon.csv");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let error = IndexError::from(io_error);

        match error {
            IndexError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_skippable() {
        assert!(IndexError::duplicate_key("x").is_skippable());
        assert!(!IndexError::not_found("x").is_skippable());
    }
}
