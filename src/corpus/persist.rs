//! Saving and restoring corpora through a [`Storage`].
//!
//! A stored object is two files:
//!
//! - `manifest.json` names the object kind and carries the aggregate counters.
//! - `documents.bin` holds the document ids in flat-index order followed by
//!   the cluster in its own order, with a CRC32 trailer.
//!
//! The flat index itself is not stored; loading re-derives it, so a restored
//! corpus satisfies the same invariants as the one that was saved. Both files
//! are written under temporary names and renamed into place, manifest last.

use std::fmt;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::corpus::DocumentId;
use crate::corpus::cluster::Cluster;
use crate::corpus::flat::FlatCorpus;
use crate::corpus::sentence_set::SentenceSet;
use crate::error::{Result, SentindexError};
use crate::storage::{
    FileStorage, Storage, StorageConfig, StorageOutput, StructReader, StructWriter,
};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const DOCUMENTS_FILE: &str = "documents.bin";
pub const FORMAT_VERSION: u32 = 1;

const DOCUMENTS_MAGIC: u32 = 0x5844_4953;

/// Half of the last stored decimal of `avg_len`.
const AVG_LEN_TOLERANCE: f64 = 0.005;

/// Kind of object held by a storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredKind {
    FlatCorpus,
    SentenceSet,
}

impl StoredKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoredKind::FlatCorpus => "flat_corpus",
            StoredKind::SentenceSet => "sentence_set",
        }
    }

    fn parse(kind: &str) -> Option<Self> {
        match kind {
            "flat_corpus" => Some(StoredKind::FlatCorpus),
            "sentence_set" => Some(StoredKind::SentenceSet),
            _ => None,
        }
    }
}

impl fmt::Display for StoredKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contents of `manifest.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub format_version: u32,
    pub kind: String,
    pub num_documents: usize,
    pub total_count: usize,
    pub max_len: usize,
    pub total_strlen: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_len: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl Manifest {
    fn new(kind: StoredKind, sentences: &SentenceSet, avg_len: Option<f64>) -> Self {
        Manifest {
            format_version: FORMAT_VERSION,
            kind: kind.as_str().to_string(),
            num_documents: sentences.document_ids.len(),
            total_count: sentences.total_count,
            max_len: sentences.max_len,
            total_strlen: sentences.total_strlen,
            avg_len,
            created_at: Utc::now(),
        }
    }

    fn stored_kind(&self) -> Result<StoredKind> {
        StoredKind::parse(&self.kind).ok_or_else(|| {
            SentindexError::type_mismatch("flat_corpus or sentence_set", self.kind.clone())
        })
    }

    fn expect_kind(&self, expected: StoredKind) -> Result<()> {
        let found = self.stored_kind()?;
        if found != expected {
            return Err(SentindexError::type_mismatch(expected.as_str(), found.as_str()));
        }
        Ok(())
    }
}

/// Read a storage's manifest.
pub fn read_manifest(storage: &dyn Storage) -> Result<Manifest> {
    let mut input = storage.open_input(MANIFEST_FILE)?;
    let mut raw = String::new();
    input.read_to_string(&mut raw)?;
    let manifest: Manifest = serde_json::from_str(&raw)?;

    if manifest.format_version != FORMAT_VERSION {
        return Err(SentindexError::corrupted(format!(
            "unsupported format version {} (expected {FORMAT_VERSION})",
            manifest.format_version
        )));
    }
    Ok(manifest)
}

/// Report what kind of object a storage holds without loading it.
pub fn stored_kind(storage: &dyn Storage) -> Result<StoredKind> {
    read_manifest(storage)?.stored_kind()
}

impl FlatCorpus {
    /// Save the full corpus to `storage`.
    pub fn to_storage(&self, storage: &dyn Storage) -> Result<()> {
        let manifest = Manifest::new(
            StoredKind::FlatCorpus,
            &self.sentence_set(),
            Some(self.avg_len()),
        );
        write_documents(storage, self.document_ids(), self.cluster())?;
        write_manifest(storage, &manifest)?;
        debug!(
            "stored flat corpus: {} documents, {} sentences",
            self.num_documents(),
            self.num_sentences()
        );
        Ok(())
    }

    /// Restore a corpus saved with [`to_storage`](Self::to_storage).
    pub fn from_storage(storage: &dyn Storage) -> Result<Self> {
        let manifest = read_manifest(storage)?;
        manifest.expect_kind(StoredKind::FlatCorpus)?;

        let (document_ids, cluster) = read_documents(storage)?;
        if document_ids.len() != manifest.num_documents {
            return Err(SentindexError::corrupted(format!(
                "manifest lists {} documents, data holds {}",
                manifest.num_documents,
                document_ids.len()
            )));
        }

        let sentences = SentenceSet {
            document_ids,
            total_count: manifest.total_count,
            max_len: manifest.max_len,
            total_strlen: manifest.total_strlen,
        };
        let corpus = FlatCorpus::new(sentences, cluster)?;

        if let Some(stored) = manifest.avg_len
            && (stored - corpus.avg_len()).abs() > AVG_LEN_TOLERANCE
        {
            return Err(SentindexError::corrupted(format!(
                "manifest avg_len {stored} disagrees with recomputed {}",
                corpus.avg_len()
            )));
        }
        Ok(corpus)
    }

    /// Save to a directory, creating it if needed.
    pub fn to_disk<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let storage = FileStorage::new(path, StorageConfig::default())?;
        self.to_storage(&storage)
    }

    /// Load from a directory written by [`to_disk`](Self::to_disk).
    pub fn from_disk<P: AsRef<Path>>(path: P) -> Result<Self> {
        let storage = open_existing(path.as_ref())?;
        Self::from_storage(&storage)
    }
}

impl SentenceSet {
    /// Save the aggregate state (no sentences) to `storage`.
    pub fn to_storage(&self, storage: &dyn Storage) -> Result<()> {
        write_documents(storage, &self.document_ids, &Cluster::new())?;
        write_manifest(storage, &Manifest::new(StoredKind::SentenceSet, self, None))
    }

    pub fn from_storage(storage: &dyn Storage) -> Result<Self> {
        let manifest = read_manifest(storage)?;
        manifest.expect_kind(StoredKind::SentenceSet)?;

        let (document_ids, _) = read_documents(storage)?;
        Ok(SentenceSet {
            document_ids,
            total_count: manifest.total_count,
            max_len: manifest.max_len,
            total_strlen: manifest.total_strlen,
        })
    }
}

/// Open a directory that must already exist.
pub(crate) fn open_existing(path: &Path) -> Result<FileStorage> {
    if !path.is_dir() {
        return Err(SentindexError::storage(format!(
            "No stored corpus at {}",
            path.display()
        )));
    }
    FileStorage::new(path, StorageConfig::default())
}

fn write_manifest(storage: &dyn Storage, manifest: &Manifest) -> Result<()> {
    let tmp_name = format!("{MANIFEST_FILE}.tmp");
    let mut output = storage.create_output(&tmp_name)?;
    serde_json::to_writer_pretty(&mut output, manifest)?;
    output.close()?;
    storage.rename_file(&tmp_name, MANIFEST_FILE)
}

fn write_documents(
    storage: &dyn Storage,
    document_ids: &[DocumentId],
    cluster: &Cluster,
) -> Result<()> {
    let tmp_name = format!("{DOCUMENTS_FILE}.tmp");
    let mut writer = StructWriter::new(storage.create_output(&tmp_name)?);

    writer.write_u32(DOCUMENTS_MAGIC)?;
    writer.write_varint(document_ids.len() as u64)?;
    for &document_id in document_ids {
        writer.write_varint(document_id)?;
    }

    writer.write_varint(cluster.len() as u64)?;
    for (document_id, sentences) in cluster.iter() {
        writer.write_varint(document_id)?;
        writer.write_varint(sentences.len() as u64)?;
        for sentence in sentences {
            writer.write_string(sentence)?;
        }
    }
    writer.close()?;

    storage.rename_file(&tmp_name, DOCUMENTS_FILE)
}

fn read_documents(storage: &dyn Storage) -> Result<(Vec<DocumentId>, Cluster)> {
    let mut reader = StructReader::new(storage.open_input(DOCUMENTS_FILE)?)?;

    let magic = reader.read_u32()?;
    if magic != DOCUMENTS_MAGIC {
        return Err(SentindexError::corrupted(format!(
            "bad magic {magic:#010x} in {DOCUMENTS_FILE}"
        )));
    }

    let id_count = reader.read_len()?;
    let mut document_ids = Vec::with_capacity(id_count);
    for _ in 0..id_count {
        document_ids.push(reader.read_varint()?);
    }

    let bucket_count = reader.read_len()?;
    let mut cluster = Cluster::with_capacity(bucket_count);
    for _ in 0..bucket_count {
        let document_id = reader.read_varint()?;
        let sentence_count = reader.read_len()?;
        let mut sentences = Vec::with_capacity(sentence_count);
        for _ in 0..sentence_count {
            sentences.push(reader.read_string()?);
        }
        cluster.insert(document_id, sentences);
    }

    reader.verify_checksum()?;
    Ok((document_ids, cluster))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::builder::CorpusBuilder;
    use crate::storage::MemoryStorage;

    fn sample() -> FlatCorpus {
        let mut builder = CorpusBuilder::new(SentenceSet::with_document_ids(vec![3, 1]));
        builder
            .add_document(3, vec!["Viral load peaked.".into(), "Ωmega".into()])
            .unwrap();
        builder.add_document(1, vec!["Masks help.".into()]).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_round_trip_memory() {
        let storage = MemoryStorage::new();
        let corpus = sample();
        corpus.to_storage(&storage).unwrap();

        assert_eq!(
            storage.list_files().unwrap(),
            vec![DOCUMENTS_FILE, MANIFEST_FILE]
        );
        assert_eq!(stored_kind(&storage).unwrap(), StoredKind::FlatCorpus);

        let restored = FlatCorpus::from_storage(&storage).unwrap();
        assert_eq!(restored.document_ids(), corpus.document_ids());
        assert_eq!(restored.cluster(), corpus.cluster());
        assert_eq!(restored.flat_index(), corpus.flat_index());
        assert_eq!(restored.stats(), corpus.stats());
        assert!(restored.validate().is_ok());
    }

    #[test]
    fn test_sentence_set_kind_mismatch() {
        let storage = MemoryStorage::new();
        let set = SentenceSet {
            document_ids: vec![5, 6],
            total_count: 4,
            max_len: 9,
            total_strlen: 20,
        };
        set.to_storage(&storage).unwrap();

        assert_eq!(stored_kind(&storage).unwrap(), StoredKind::SentenceSet);
        assert_eq!(SentenceSet::from_storage(&storage).unwrap(), set);

        match FlatCorpus::from_storage(&storage) {
            Err(SentindexError::TypeMismatch { expected, found }) => {
                assert_eq!(expected, "flat_corpus");
                assert_eq!(found, "sentence_set");
            }
            other => panic!("expected a type mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupted_documents_detected() {
        let storage = MemoryStorage::new();
        sample().to_storage(&storage).unwrap();

        let mut bytes = storage.file_bytes(DOCUMENTS_FILE).unwrap();
        let last_payload = bytes.len() - 5;
        bytes[last_payload] ^= 0x20;
        storage.put_file(DOCUMENTS_FILE, bytes);

        assert!(matches!(
            FlatCorpus::from_storage(&storage),
            Err(SentindexError::Corrupted(_))
        ));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let storage = MemoryStorage::new();
        sample().to_storage(&storage).unwrap();

        let mut manifest = read_manifest(&storage).unwrap();
        manifest.format_version = 99;
        storage.put_file(MANIFEST_FILE, serde_json::to_vec(&manifest).unwrap());

        assert!(matches!(
            stored_kind(&storage),
            Err(SentindexError::Corrupted(_))
        ));
    }

    #[test]
    fn test_avg_len_checked_against_manifest() {
        let storage = MemoryStorage::new();
        sample().to_storage(&storage).unwrap();

        let mut manifest = read_manifest(&storage).unwrap();
        manifest.avg_len = manifest.avg_len.map(|avg_len| avg_len + 1.0);
        assert!(manifest.avg_len.is_some());
        storage.put_file(MANIFEST_FILE, serde_json::to_vec(&manifest).unwrap());

        match FlatCorpus::from_storage(&storage) {
            Err(SentindexError::Corrupted(msg)) => assert!(msg.contains("avg_len")),
            other => panic!("expected corrupted data, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_manifest() {
        let storage = MemoryStorage::new();
        assert!(FlatCorpus::from_storage(&storage).is_err());
    }
}
