//! # Sentindex
//!
//! Flat sentence addressing for large, sentence-segmented paper corpora.
//!
//! ## Features
//!
//! - Every sentence addressable by one integer id, mapped back to its
//!   document and local offset
//! - Shards built independently and merged into one corpus
//! - Checksummed on-disk persistence behind a pluggable storage layer
//! - A loader for directories of per-paper JSON files

pub mod cli;
pub mod corpus;
pub mod error;
pub mod source;
pub mod storage;
pub mod util;

pub mod prelude {
    pub use crate::corpus::{
        Cluster, CorpusBuilder, DocumentId, FlatCorpus, FlatId, SentenceLocation, SentenceSet,
        merge,
    };
    pub use crate::error::{Result, SentindexError};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
