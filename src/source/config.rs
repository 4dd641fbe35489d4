//! Configuration of a paper source.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where a paper source lives and which files belong to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory holding one file per paper.
    pub root: PathBuf,

    /// File extension of paper files, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    "json".to_string()
}

impl SourceConfig {
    /// Configure a source rooted at `root` with the default `json` extension.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        SourceConfig {
            root: root.as_ref().to_path_buf(),
            extension: default_extension(),
        }
    }

    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    /// Parse a list of sources from JSON, e.g. a config file.
    pub fn list_from_json(raw: &str) -> crate::error::Result<Vec<SourceConfig>> {
        Ok(serde_json::from_str(raw)?)
    }
}
