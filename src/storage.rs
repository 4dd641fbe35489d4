//! Storage abstraction layer for Sentindex.
//!
//! Persisted corpora live in a flat namespace of named files. The
//! [`Storage`] trait hides whether that namespace is a directory on disk or a
//! map in memory, so persistence code is written once.
//!
//! # Storage Types
//!
//! ## FileStorage
//! - One directory per stored corpus
//! - Buffered reads and writes, fsync on close unless disabled
//!
//! ## MemoryStorage
//! - In-memory storage for testing and temporary corpora
//! - Fast but non-persistent
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//!
//! use sentindex::storage::{MemoryStorage, Storage, StorageOutput};
//!
//! # fn main() -> sentindex::error::Result<()> {
//! let storage = MemoryStorage::new();
//! let mut output = storage.create_output("notes.txt")?;
//! output.write_all(b"hello")?;
//! output.close()?;
//!
//! storage.rename_file("notes.txt", "kept.txt")?;
//! assert_eq!(storage.list_files()?, vec!["kept.txt"]);
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod memory;
pub mod structured;
pub mod traits;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use structured::{StructReader, StructWriter};
pub use traits::{Storage, StorageConfig, StorageError, StorageInput, StorageOutput};
