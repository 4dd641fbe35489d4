//! Aggregate state used to bootstrap a flat corpus.

use serde::{Deserialize, Serialize};

use crate::corpus::DocumentId;
use crate::corpus::cluster::Cluster;

/// Document ids contributing sentences plus the corpus-wide counters.
///
/// All fields start empty or zero; a producer fills them before the set is
/// handed to [`FlatCorpus::new`](crate::corpus::FlatCorpus::new).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSet {
    /// Document ids, in the order that fixes flat id assignment.
    pub document_ids: Vec<DocumentId>,

    /// Total number of sentences across all documents.
    pub total_count: usize,

    /// Length of the longest sentence, in characters.
    pub max_len: usize,

    /// Sum of all sentence lengths, in characters.
    pub total_strlen: usize,
}

impl SentenceSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set for the given documents with all counters at zero.
    pub fn with_document_ids(document_ids: Vec<DocumentId>) -> Self {
        SentenceSet {
            document_ids,
            ..Self::default()
        }
    }

    /// Produce one empty bucket per document id, in `document_ids` order.
    pub fn init_buckets(&self) -> Cluster {
        let mut buckets = Cluster::with_capacity(self.document_ids.len());
        for &document_id in &self.document_ids {
            buckets.insert(document_id, Vec::new());
        }
        buckets
    }

    /// Total number of sentences.
    pub fn len(&self) -> usize {
        self.total_count
    }

    /// Whether the set counts no sentences.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Fold one sentence of `chars` characters into the counters.
    pub(crate) fn record_sentence(&mut self, chars: usize) {
        self.total_count += 1;
        self.total_strlen += chars;
        self.max_len = self.max_len.max(chars);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let set = SentenceSet::new();
        assert!(set.document_ids.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert_eq!(set.max_len, 0);
        assert_eq!(set.total_strlen, 0);
    }

    #[test]
    fn test_init_buckets() {
        let set = SentenceSet::with_document_ids(vec![7, 3, 9]);
        let buckets = set.init_buckets();

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets.document_ids().collect::<Vec<_>>(), vec![7, 3, 9]);
        assert!(buckets.iter().all(|(_, sentences)| sentences.is_empty()));

        // Pure derivation: the set itself is untouched.
        assert_eq!(set.document_ids, vec![7, 3, 9]);
    }

    #[test]
    fn test_init_buckets_collapses_duplicate_ids() {
        let set = SentenceSet::with_document_ids(vec![1, 2, 1]);
        let buckets = set.init_buckets();
        assert_eq!(buckets.document_ids().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_record_sentence() {
        let mut set = SentenceSet::new();
        set.record_sentence(4);
        set.record_sentence(10);
        set.record_sentence(2);

        assert_eq!(set.len(), 3);
        assert_eq!(set.max_len, 10);
        assert_eq!(set.total_strlen, 16);
    }
}
