//! Storage abstraction trait and common types.

use std::io::{Read, Write};

use thiserror::Error;

use crate::error::{Result, SentindexError};

/// A flat namespace of named files holding one stored object.
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Open a file for reading. The file must exist.
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    /// Create (or truncate) a file for writing.
    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    /// Names of all files, sorted.
    fn list_files(&self) -> Result<Vec<String>>;

    /// Rename a file, replacing any file already named `new_name`.
    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()>;
}

/// A readable file whose total size is known up front.
pub trait StorageInput: Read + Send + std::fmt::Debug {
    fn size(&self) -> Result<u64>;
}

/// A writable file. Contents are only guaranteed to be visible after `close`.
pub trait StorageOutput: Write + Send + std::fmt::Debug {
    fn close(&mut self) -> Result<()>;
}

impl StorageOutput for Box<dyn StorageOutput> {
    fn close(&mut self) -> Result<()> {
        self.as_mut().close()
    }
}

impl StorageInput for Box<dyn StorageInput> {
    fn size(&self) -> Result<u64> {
        self.as_ref().size()
    }
}

/// Configuration for storage backends.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Buffer size for file reads and writes.
    pub buffer_size: usize,

    /// fsync files on close, before they are renamed into place.
    pub sync_on_close: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            buffer_size: 64 * 1024,
            sync_on_close: true,
        }
    }
}

/// Failures raised by storage backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl StorageError {
    pub(crate) fn from_io(name: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            StorageError::FileNotFound(name.to_string())
        } else {
            StorageError::Io(format!("{name}: {err}"))
        }
    }
}

impl From<StorageError> for SentindexError {
    fn from(err: StorageError) -> Self {
        SentindexError::storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();

        assert_eq!(config.buffer_size, 65536);
        assert!(config.sync_on_close);
    }

    #[test]
    fn test_from_io_maps_not_found() {
        let err = StorageError::from_io(
            "manifest.json",
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err, StorageError::FileNotFound("manifest.json".to_string()));
        assert_eq!(err.to_string(), "File not found: manifest.json");

        let err = StorageError::from_io("documents.bin", std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "I/O error: documents.bin: disk full");
    }

    #[test]
    fn test_storage_error_converts() {
        let err: SentindexError = StorageError::FileNotFound("a".to_string()).into();
        assert_eq!(err.to_string(), "Storage error: File not found: a");
    }
}
