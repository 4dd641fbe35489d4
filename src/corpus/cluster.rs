//! Insertion-ordered mapping from document id to its sentences.

use ahash::AHashMap;

use crate::corpus::DocumentId;

/// Mapping from document id to the ordered sentences of that document.
///
/// Iteration follows first-insertion order. Re-inserting an existing id
/// replaces its bucket in place without moving it, so [`Cluster::update`]
/// behaves as last-write-wins per key while keeping the first position.
#[derive(Debug, Clone, Default)]
pub struct Cluster {
    entries: Vec<(DocumentId, Vec<String>)>,
    positions: AHashMap<DocumentId, usize>,
}

impl Cluster {
    /// Create an empty cluster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cluster with room for `capacity` documents.
    pub fn with_capacity(capacity: usize) -> Self {
        Cluster {
            entries: Vec::with_capacity(capacity),
            positions: AHashMap::with_capacity(capacity),
        }
    }

    /// Insert a bucket, returning the bucket it replaced.
    pub fn insert(
        &mut self,
        document_id: DocumentId,
        sentences: Vec<String>,
    ) -> Option<Vec<String>> {
        match self.positions.get(&document_id) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, sentences)),
            None => {
                self.positions.insert(document_id, self.entries.len());
                self.entries.push((document_id, sentences));
                None
            }
        }
    }

    /// Apply every entry of `other` in its order; later writes win.
    pub fn update(&mut self, other: &Cluster) {
        for (document_id, sentences) in other.iter() {
            self.insert(document_id, sentences.to_vec());
        }
    }

    /// Sentences of a document.
    pub fn get(&self, document_id: DocumentId) -> Option<&[String]> {
        self.positions
            .get(&document_id)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    /// Mutable bucket of a document.
    pub fn get_mut(&mut self, document_id: DocumentId) -> Option<&mut Vec<String>> {
        match self.positions.get(&document_id) {
            Some(&pos) => Some(&mut self.entries[pos].1),
            None => None,
        }
    }

    pub fn contains(&self, document_id: DocumentId) -> bool {
        self.positions.contains_key(&document_id)
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of sentences over all buckets.
    pub fn sentence_count(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.len()).sum()
    }

    /// Document ids in iteration order.
    pub fn document_ids(&self) -> impl Iterator<Item = DocumentId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// `(document id, sentences)` pairs in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentId, &[String])> + '_ {
        self.entries.iter().map(|(id, s)| (*id, s.as_slice()))
    }

    pub(crate) fn entries(&self) -> &[(DocumentId, Vec<String>)] {
        &self.entries
    }
}

impl PartialEq for Cluster {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Cluster {}

impl FromIterator<(DocumentId, Vec<String>)> for Cluster {
    fn from_iter<I: IntoIterator<Item = (DocumentId, Vec<String>)>>(iter: I) -> Self {
        let mut cluster = Cluster::new();
        for (document_id, sentences) in iter {
            cluster.insert(document_id, sentences);
        }
        cluster
    }
}
