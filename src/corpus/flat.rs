//! The flat corpus: sentences addressed by a single integer id.
//!
//! A [`FlatCorpus`] owns a [`Cluster`] and a flat index built once at
//! construction by walking `document_ids` (outer) and local offsets (inner).
//! The order of `document_ids`, not the cluster's own order, fixes which flat
//! id each sentence receives. Iteration follows the cluster's order instead,
//! and the two orders may differ.

use std::fmt;
use std::ops::Index;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::cluster::Cluster;
use crate::corpus::sentence_set::SentenceSet;
use crate::corpus::{DocumentId, FlatId};
use crate::error::{Result, SentindexError};

/// Where a flat id points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceLocation {
    /// The flat id as it was requested (may be negative).
    pub flat_id: FlatId,

    /// Document the sentence belongs to.
    pub document_id: DocumentId,

    /// `(document id, local offset)` pair.
    pub loc: (DocumentId, usize),
}

/// Derived statistics of a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStats {
    pub num_documents: usize,
    pub num_sentences: usize,
    pub max_len: usize,
    pub total_strlen: usize,
    pub avg_len: f64,
}

/// A corpus whose sentences are addressable by flat id.
#[derive(Debug, Clone)]
pub struct FlatCorpus {
    document_ids: Vec<DocumentId>,
    total_count: usize,
    max_len: usize,
    total_strlen: usize,
    cluster: Cluster,
    avg_len: f64,
    num_documents: usize,
    num_sentences: usize,
    flat_index: Vec<(DocumentId, usize)>,
}

impl FlatCorpus {
    /// Build a corpus from its aggregate state and the matching cluster.
    ///
    /// Fails with [`SentindexError::EmptyCorpus`] when `total_count` is zero,
    /// and with [`SentindexError::KeyNotFound`] when a listed document id has
    /// no bucket in `cluster`.
    pub fn new(sentences: SentenceSet, cluster: Cluster) -> Result<Self> {
        let SentenceSet {
            document_ids,
            total_count,
            max_len,
            total_strlen,
        } = sentences;

        if total_count == 0 {
            return Err(SentindexError::EmptyCorpus);
        }

        let flat_index = build_flat_index(&document_ids, &cluster)?;
        if flat_index.len() != total_count {
            warn!(
                "flat index holds {} entries but the corpus counts {} sentences",
                flat_index.len(),
                total_count
            );
        }

        let avg_len = round2(total_strlen as f64 / total_count as f64);
        let num_documents = document_ids.len();
        debug!(
            "built flat corpus: {num_documents} documents, {total_count} sentences, avg_len {avg_len}"
        );

        Ok(FlatCorpus {
            document_ids,
            total_count,
            max_len,
            total_strlen,
            cluster,
            avg_len,
            num_documents,
            num_sentences: total_count,
            flat_index,
        })
    }

    /// Resolve a flat id to its sentence. Negative ids count from the end.
    pub fn get_sentence(&self, flat_id: FlatId) -> Result<&str> {
        let (document_id, offset) = self.resolve(flat_id)?;
        self.cluster
            .get(document_id)
            .and_then(|sentences| sentences.get(offset))
            .map(String::as_str)
            .ok_or(SentindexError::KeyNotFound(document_id))
    }

    /// Like [`get_sentence`](Self::get_sentence) but returns `None` when out of range.
    pub fn get(&self, flat_id: FlatId) -> Option<&str> {
        self.get_sentence(flat_id).ok()
    }

    /// Resolve many flat ids at once.
    ///
    /// Ids may repeat and come in any order; the result preserves input order.
    /// The first unresolvable id fails the whole call.
    pub fn lookup(&self, flat_ids: &[FlatId]) -> Result<Vec<SentenceLocation>> {
        flat_ids
            .iter()
            .map(|&flat_id| {
                let (document_id, offset) = self.resolve(flat_id)?;
                Ok(SentenceLocation {
                    flat_id,
                    document_id,
                    loc: (document_id, offset),
                })
            })
            .collect()
    }

    /// All sentences of one document, in order.
    pub fn sentences_of(&self, document_id: DocumentId) -> Result<&[String]> {
        self.cluster
            .get(document_id)
            .ok_or(SentindexError::KeyNotFound(document_id))
    }

    /// Sentences selected by `[start:stop:step]`, with sequence slice semantics.
    ///
    /// Bounds are clamped the way sequence slicing clamps them; only a zero
    /// step is an error.
    pub fn slice(
        &self,
        start: Option<FlatId>,
        stop: Option<FlatId>,
        step: Option<FlatId>,
    ) -> Result<Vec<&str>> {
        slice_positions(self.flat_index.len(), start, stop, step)?
            .into_iter()
            .map(|pos| self.get_sentence(pos as FlatId))
            .collect()
    }

    /// Iterate over every sentence in the cluster's own order.
    pub fn iter(&self) -> Sentences<'_> {
        Sentences {
            documents: self.cluster.entries().iter(),
            current: [].iter(),
        }
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.num_sentences
    }

    pub fn is_empty(&self) -> bool {
        self.num_sentences == 0
    }

    pub fn contains_document(&self, document_id: DocumentId) -> bool {
        self.cluster.contains(document_id)
    }

    pub fn document_ids(&self) -> &[DocumentId] {
        &self.document_ids
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    /// The flat id to `(document id, local offset)` table.
    pub fn flat_index(&self) -> &[(DocumentId, usize)] {
        &self.flat_index
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn total_strlen(&self) -> usize {
        self.total_strlen
    }

    /// Average sentence length, rounded to two decimals.
    pub fn avg_len(&self) -> f64 {
        self.avg_len
    }

    pub fn num_documents(&self) -> usize {
        self.num_documents
    }

    pub fn num_sentences(&self) -> usize {
        self.num_sentences
    }

    /// The aggregate state this corpus was built from.
    pub fn sentence_set(&self) -> SentenceSet {
        SentenceSet {
            document_ids: self.document_ids.clone(),
            total_count: self.total_count,
            max_len: self.max_len,
            total_strlen: self.total_strlen,
        }
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            num_documents: self.num_documents,
            num_sentences: self.num_sentences,
            max_len: self.max_len,
            total_strlen: self.total_strlen,
            avg_len: self.avg_len,
        }
    }

    /// Check that the flat index is a bijection onto the cluster.
    ///
    /// Corpora merged from shards that share a document id fail this check.
    pub fn validate(&self) -> Result<()> {
        let expected: usize = self
            .document_ids
            .iter()
            .map(|&id| self.cluster.get(id).map_or(0, <[String]>::len))
            .sum();
        if self.flat_index.len() != self.num_sentences || expected != self.num_sentences {
            return Err(SentindexError::corrupted(format!(
                "inconsistent corpus: {} flat entries, {} bucketed sentences, {} counted",
                self.flat_index.len(),
                expected,
                self.num_sentences
            )));
        }

        let mut seen = ahash::AHashSet::with_capacity(self.flat_index.len());
        for &(document_id, offset) in &self.flat_index {
            if !seen.insert((document_id, offset)) {
                return Err(SentindexError::corrupted(format!(
                    "inconsistent corpus: ({document_id}, {offset}) is addressed twice"
                )));
            }
        }
        Ok(())
    }

    fn resolve(&self, flat_id: FlatId) -> Result<(DocumentId, usize)> {
        let len = self.flat_index.len();
        let pos = if flat_id < 0 {
            flat_id + len as FlatId
        } else {
            flat_id
        };
        if pos < 0 || pos >= len as FlatId {
            return Err(SentindexError::out_of_range(flat_id, len));
        }
        Ok(self.flat_index[pos as usize])
    }
}

impl Index<usize> for FlatCorpus {
    type Output = str;

    /// Panics when `index` is out of range, like slice indexing.
    fn index(&self, index: usize) -> &str {
        match FlatId::try_from(index).ok().and_then(|id| self.get(id)) {
            Some(sentence) => sentence,
            None => panic!(
                "flat id {index} out of range for corpus of {} sentences",
                self.flat_index.len()
            ),
        }
    }
}

impl<'a> IntoIterator for &'a FlatCorpus {
    type Item = &'a str;
    type IntoIter = Sentences<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for FlatCorpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FlatCorpus(avg_len={}, num_documents={}, num_sentences={})",
            self.avg_len, self.num_documents, self.num_sentences
        )
    }
}

/// Iterator over every sentence of a corpus, in cluster order.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    documents: std::slice::Iter<'a, (DocumentId, Vec<String>)>,
    current: std::slice::Iter<'a, String>,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(sentence) = self.current.next() {
                return Some(sentence.as_str());
            }
            let (_, sentences) = self.documents.next()?;
            self.current = sentences.iter();
        }
    }
}

fn build_flat_index(
    document_ids: &[DocumentId],
    cluster: &Cluster,
) -> Result<Vec<(DocumentId, usize)>> {
    let mut flat_index = Vec::with_capacity(cluster.sentence_count());
    for &document_id in document_ids {
        let bucket = cluster
            .get(document_id)
            .ok_or(SentindexError::KeyNotFound(document_id))?;
        flat_index.extend((0..bucket.len()).map(|offset| (document_id, offset)));
    }
    Ok(flat_index)
}

/// Round to two decimals, ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Positions selected by a `[start:stop:step]` slice over `len` items.
pub(crate) fn slice_positions(
    len: usize,
    start: Option<FlatId>,
    stop: Option<FlatId>,
    step: Option<FlatId>,
) -> Result<Vec<usize>> {
    let step = step.unwrap_or(1);
    if step == 0 {
        return Err(SentindexError::InvalidSlice(
            "slice step cannot be zero".to_string(),
        ));
    }

    let len = len as FlatId;
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let clamp = |bound: FlatId| {
        if bound < 0 {
            (bound + len).max(lower)
        } else {
            bound.min(upper)
        }
    };
    let start = start.map_or(if step > 0 { lower } else { upper }, clamp);
    let stop = stop.map_or(if step > 0 { upper } else { lower }, clamp);

    let mut positions = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        positions.push(i as usize);
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    Ok(positions)
}
