//! A directory of per-paper JSON files addressed by id or integer index.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use ahash::AHashMap;
use anyhow::Context;
use log::debug;
use serde_json::Value;

use crate::corpus::DocumentId;
use crate::error::{Result, SentindexError};
use crate::source::config::SourceConfig;

/// How to address a paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperKey {
    /// 1-based integer index assigned when the source was opened.
    Index(DocumentId),
    /// Paper identifier (file name without extension).
    Id(String),
}

/// A scanned directory of paper files.
///
/// Files are indexed in file-name order starting at 1, so the same directory
/// always yields the same indices.
#[derive(Debug, Clone)]
pub struct PaperSource {
    config: SourceConfig,
    paper_ids: Vec<String>,
    paper_index: AHashMap<String, DocumentId>,
}

impl PaperSource {
    /// Scan the configured directory.
    pub fn open(config: SourceConfig) -> Result<Self> {
        if !config.root.is_dir() {
            return Err(SentindexError::source(format!(
                "The path to directory is not valid, got {}",
                config.root.display()
            )));
        }

        let suffix = format!(".{}", config.extension);
        let mut paper_ids = Vec::new();
        for entry in std::fs::read_dir(&config.root)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str())
                && let Some(stem) = name.strip_suffix(&suffix)
                && !stem.is_empty()
            {
                paper_ids.push(stem.to_string());
            }
        }
        paper_ids.sort();

        let paper_index = paper_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i as DocumentId + 1))
            .collect();

        debug!(
            "opened paper source {}: {} papers",
            config.root.display(),
            paper_ids.len()
        );

        Ok(PaperSource {
            config,
            paper_ids,
            paper_index,
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn num_papers(&self) -> usize {
        self.paper_ids.len()
    }

    /// Last component of the source directory.
    pub fn source_name(&self) -> String {
        self.config
            .root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config.root.display().to_string())
    }

    /// Paper ids in index order.
    pub fn paper_ids(&self) -> &[String] {
        &self.paper_ids
    }

    pub fn index_of(&self, paper_id: &str) -> Option<DocumentId> {
        self.paper_index.get(paper_id).copied()
    }

    pub fn paper_id_of(&self, index: DocumentId) -> Option<&str> {
        let pos = usize::try_from(index).ok()?.checked_sub(1)?;
        self.paper_ids.get(pos).map(String::as_str)
    }

    /// Map paper ids to indices, skipping unknown ids.
    pub fn encode<S: AsRef<str>>(&self, paper_ids: &[S]) -> Vec<DocumentId> {
        paper_ids
            .iter()
            .filter_map(|id| self.index_of(id.as_ref()))
            .collect()
    }

    /// Map indices to paper ids, skipping unknown indices.
    pub fn decode(&self, indices: &[DocumentId]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&index| self.paper_id_of(index).map(str::to_string))
            .collect()
    }

    /// Load and parse a single paper.
    pub fn load_paper(&self, key: PaperKey) -> Result<Value> {
        match key {
            PaperKey::Index(index) => {
                let paper_id = self
                    .paper_id_of(index)
                    .ok_or(SentindexError::KeyNotFound(index))?;
                self.load_data(paper_id)
            }
            PaperKey::Id(paper_id) => self.load_data(&paper_id),
        }
    }

    /// Load papers by index, in the given order. Unknown indices are skipped.
    pub fn load_papers_by_index(&self, indices: &[DocumentId]) -> Result<Vec<Value>> {
        self.decode(indices)
            .iter()
            .map(|paper_id| self.load_data(paper_id))
            .collect()
    }

    /// Load papers by id, in the given order. Any unreadable id fails the call.
    pub fn load_papers_by_id<S: AsRef<str>>(&self, paper_ids: &[S]) -> Result<Vec<Value>> {
        paper_ids
            .iter()
            .map(|paper_id| self.load_data(paper_id.as_ref()))
            .collect()
    }

    fn paper_path(&self, paper_id: &str) -> PathBuf {
        self.config
            .root
            .join(format!("{paper_id}.{}", self.config.extension))
    }

    fn load_data(&self, paper_id: &str) -> Result<Value> {
        let path = self.paper_path(paper_id);
        let file = File::open(&path).map_err(|e| {
            SentindexError::source(format!("Cannot open paper {paper_id}: {e}"))
        })?;
        let paper = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Malformed paper {paper_id} at {}", path.display()))?;
        Ok(paper)
    }
}

impl fmt::Display for PaperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PaperSource({}, papers={})",
            self.source_name(),
            self.num_papers()
        )
    }
}
