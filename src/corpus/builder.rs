//! Producer side: fill per-document buckets and keep the counters in step.

use crate::corpus::DocumentId;
use crate::corpus::cluster::Cluster;
use crate::corpus::flat::FlatCorpus;
use crate::corpus::sentence_set::SentenceSet;
use crate::error::{Result, SentindexError};

/// Incrementally assembles a [`FlatCorpus`].
///
/// The builder starts from the empty buckets of a [`SentenceSet`]; sentences
/// can only be added to documents listed in it. Lengths are counted in
/// characters.
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    sentences: SentenceSet,
    buckets: Cluster,
}

impl CorpusBuilder {
    pub fn new(sentences: SentenceSet) -> Self {
        let buckets = sentences.init_buckets();
        CorpusBuilder { sentences, buckets }
    }

    /// Append one sentence to a document's bucket.
    pub fn push(&mut self, document_id: DocumentId, sentence: String) -> Result<()> {
        let bucket = self
            .buckets
            .get_mut(document_id)
            .ok_or(SentindexError::KeyNotFound(document_id))?;
        self.sentences.record_sentence(sentence.chars().count());
        bucket.push(sentence);
        Ok(())
    }

    /// Append all sentences of a document, in order.
    pub fn add_document(&mut self, document_id: DocumentId, sentences: Vec<String>) -> Result<()> {
        if !self.buckets.contains(document_id) {
            return Err(SentindexError::KeyNotFound(document_id));
        }
        for sentence in sentences {
            self.push(document_id, sentence)?;
        }
        Ok(())
    }

    /// Current counters.
    pub fn sentence_set(&self) -> &SentenceSet {
        &self.sentences
    }

    pub fn build(self) -> Result<FlatCorpus> {
        FlatCorpus::new(self.sentences, self.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_counts_characters() {
        let mut builder = CorpusBuilder::new(SentenceSet::with_document_ids(vec![1, 2]));
        builder.push(1, "héllo".to_string()).unwrap();
        builder.push(2, "ab".to_string()).unwrap();

        let set = builder.sentence_set();
        assert_eq!(set.total_count, 2);
        assert_eq!(set.max_len, 5);
        assert_eq!(set.total_strlen, 7);

        let corpus = builder.build().unwrap();
        assert_eq!(corpus.avg_len(), 3.5);
    }

    #[test]
    fn test_builder_rejects_unknown_document() {
        let mut builder = CorpusBuilder::new(SentenceSet::with_document_ids(vec![1]));
        assert!(matches!(
            builder.push(5, "x".to_string()),
            Err(SentindexError::KeyNotFound(5))
        ));
        assert!(builder.add_document(5, vec!["x".to_string()]).is_err());
        assert_eq!(builder.sentence_set().total_count, 0);
    }

    #[test]
    fn test_builder_allows_empty_documents() {
        let mut builder = CorpusBuilder::new(SentenceSet::with_document_ids(vec![1, 2, 3]));
        builder.add_document(1, vec!["a".to_string()]).unwrap();
        builder.add_document(3, vec!["b".to_string()]).unwrap();

        let corpus = builder.build().unwrap();
        assert_eq!(corpus.num_documents(), 3);
        assert_eq!(corpus.flat_index(), &[(1, 0), (3, 0)]);
        assert!(corpus.sentences_of(2).unwrap().is_empty());
    }

    #[test]
    fn test_build_without_sentences_fails() {
        let builder = CorpusBuilder::new(SentenceSet::with_document_ids(vec![1]));
        assert!(matches!(builder.build(), Err(SentindexError::EmptyCorpus)));
    }
}
