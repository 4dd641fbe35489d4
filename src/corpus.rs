//! Flat sentence addressing for sentence-segmented paper corpora.
//!
//! A corpus is a set of documents, each an ordered list of sentences. This
//! module assigns every sentence a single flat id and keeps the bijection
//! between that flat id space and the two-level `(document id, local offset)`
//! space.
//!
//! # Core Components
//!
//! - [`SentenceSet`] - document ids plus aggregate counters, the bootstrap state
//! - [`Cluster`] - insertion-ordered mapping from document id to sentences
//! - [`FlatCorpus`] - the cluster plus a flat index built once at construction
//! - [`merge`] - combine independently built shards into one corpus
//! - [`CorpusBuilder`] - producer that fills buckets and keeps the counters
//!
//! # Examples
//!
//! ```
//! use sentindex::corpus::{CorpusBuilder, SentenceSet};
//!
//! # fn main() -> sentindex::error::Result<()> {
//! let mut builder = CorpusBuilder::new(SentenceSet::with_document_ids(vec![1, 2]));
//! builder.add_document(1, vec!["s1".to_string(), "s2".to_string()])?;
//! builder.add_document(2, vec!["s3".to_string()])?;
//!
//! let corpus = builder.build()?;
//! assert_eq!(corpus.len(), 3);
//! assert_eq!(corpus.get_sentence(2)?, "s3");
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cluster;
pub mod flat;
pub mod merge;
pub mod persist;
pub mod sentence_set;

pub use builder::CorpusBuilder;
pub use cluster::Cluster;
pub use flat::{CorpusStats, FlatCorpus, SentenceLocation, Sentences};
pub use merge::{merge, merge_stored};
pub use persist::{StoredKind, stored_kind};
pub use sentence_set::SentenceSet;

/// Integer identifier of a source document.
pub type DocumentId = u64;

/// Signed flat sentence id; negative values count from the end.
pub type FlatId = i64;
