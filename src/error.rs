//! Error types for the Sentindex library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`SentindexError`] enum. Resolution errors (`IndexOutOfRange`,
//! `KeyNotFound`) are raised eagerly at the call that detects them and are
//! never clamped or recovered from inside the library.
//!
//! # Examples
//!
//! ```
//! use sentindex::error::{Result, SentindexError};
//!
//! fn resolve(index: i64, len: usize) -> Result<usize> {
//!     if index < 0 || index as usize >= len {
//!         return Err(SentindexError::out_of_range(index, len));
//!     }
//!     Ok(index as usize)
//! }
//!
//! assert!(resolve(3, 3).is_err());
//! ```

use std::io;

use thiserror::Error;

use crate::corpus::DocumentId;

/// The main error type for Sentindex operations.
#[derive(Error, Debug)]
pub enum SentindexError {
    /// A flat sentence id outside `[-len, len)`.
    #[error("Index out of range: {index} (corpus holds {len} sentences)")]
    IndexOutOfRange { index: i64, len: usize },

    /// A document id that is not present in the cluster.
    #[error("Document not found: {0}")]
    KeyNotFound(DocumentId),

    /// A stored object of a different kind than the one requested.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A corpus with zero sentences was about to be constructed.
    #[error("Corpus holds no sentences")]
    EmptyCorpus,

    /// Slice parameters that cannot select anything (step of zero).
    #[error("Invalid slice: {0}")]
    InvalidSlice(String),

    /// Stored data failed its checksum or format checks.
    #[error("Corrupted data: {0}")]
    Corrupted(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Paper source (loader) errors
    #[error("Source error: {0}")]
    Source(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SentindexError.
pub type Result<T> = std::result::Result<T, SentindexError>;

impl SentindexError {
    /// Create a new out-of-range error for a flat id.
    pub fn out_of_range(index: i64, len: usize) -> Self {
        SentindexError::IndexOutOfRange { index, len }
    }

    /// Create a new type mismatch error.
    pub fn type_mismatch<E: Into<String>, F: Into<String>>(expected: E, found: F) -> Self {
        SentindexError::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a new corrupted-data error.
    pub fn corrupted<S: Into<String>>(msg: S) -> Self {
        SentindexError::Corrupted(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SentindexError::Storage(msg.into())
    }

    /// Create a new source error.
    pub fn source<S: Into<String>>(msg: S) -> Self {
        SentindexError::Source(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SentindexError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        SentindexError::Other(format!("Invalid argument: {}", msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SentindexError::out_of_range(5, 3);
        assert_eq!(
            error.to_string(),
            "Index out of range: 5 (corpus holds 3 sentences)"
        );

        let error = SentindexError::KeyNotFound(42);
        assert_eq!(error.to_string(), "Document not found: 42");

        let error = SentindexError::type_mismatch("flat_corpus", "sentence_set");
        assert_eq!(
            error.to_string(),
            "Type mismatch: expected flat_corpus, found sentence_set"
        );

        let error = SentindexError::storage("Test storage error");
        assert_eq!(error.to_string(), "Storage error: Test storage error");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = SentindexError::from(io_error);

        match error {
            SentindexError::Io(_) => {}
            _ => panic!("Expected IO error"),
        }
    }

    #[test]
    fn test_invalid_argument_message() {
        let error = SentindexError::invalid_argument("step must not be zero");
        assert_eq!(
            error.to_string(),
            "Error: Invalid argument: step must not be zero"
        );
    }
}
