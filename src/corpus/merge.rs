//! Combine independently built corpora (shards) into one.

use log::{debug, warn};

use crate::corpus::flat::FlatCorpus;
use crate::corpus::persist::{StoredKind, stored_kind};
use crate::corpus::sentence_set::SentenceSet;
use crate::error::{Result, SentindexError};
use crate::storage::Storage;

/// Merge shards into a new corpus, in the given order.
///
/// Counters are summed (`max_len` takes the maximum), document ids are
/// concatenated in input order with duplicates kept, and buckets are applied
/// in input order so a document id present in several shards ends up with the
/// bucket of the last one. The flat index is rebuilt from the concatenated ids,
/// so flat ids of the inputs are not preserved in general. Inputs are only read.
pub fn merge<'a, I>(corpora: I) -> Result<FlatCorpus>
where
    I: IntoIterator<Item = &'a FlatCorpus>,
{
    let mut merged = SentenceSet::new();
    let mut buckets = merged.init_buckets();
    let mut shards = 0usize;

    for corpus in corpora {
        merged.total_strlen += corpus.total_strlen();
        merged.total_count += corpus.total_count();
        merged.max_len = merged.max_len.max(corpus.max_len());
        merged
            .document_ids
            .extend_from_slice(corpus.document_ids());
        buckets.update(corpus.cluster());
        shards += 1;
    }

    if shards == 0 {
        return Err(SentindexError::invalid_argument(
            "merge requires at least one corpus",
        ));
    }

    let duplicates = merged.document_ids.len().saturating_sub(buckets.len());
    if duplicates > 0 {
        warn!("merging {shards} shards: {duplicates} document ids appear more than once");
    }
    debug!(
        "merging {shards} shards into {} documents, {} sentences",
        merged.document_ids.len(),
        merged.total_count
    );

    FlatCorpus::new(merged, buckets)
}

/// Load stored shards and merge them.
///
/// Every shard is checked to hold a flat corpus before any is loaded; the
/// first that does not fails the call with [`SentindexError::TypeMismatch`].
pub fn merge_stored(storages: &[&dyn Storage]) -> Result<FlatCorpus> {
    for (position, storage) in storages.iter().enumerate() {
        let kind = stored_kind(*storage)?;
        if kind != StoredKind::FlatCorpus {
            debug!("shard {position} holds a {kind}, refusing to merge");
            return Err(SentindexError::type_mismatch(
                StoredKind::FlatCorpus.as_str(),
                kind.as_str(),
            ));
        }
    }

    let shards = storages
        .iter()
        .map(|storage| FlatCorpus::from_storage(*storage))
        .collect::<Result<Vec<_>>>()?;
    merge(&shards)
}
