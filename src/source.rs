//! Loading raw paper records from a directory of JSON files.
//!
//! A [`PaperSource`] maps paper identifiers (file stems) to small integer
//! indices and parses individual papers on demand. It holds no sentence data
//! itself; producers use it to obtain records, split them into sentences
//! elsewhere, and feed the result to a
//! [`CorpusBuilder`](crate::corpus::CorpusBuilder).
//!
//! Source locations are always supplied through [`SourceConfig`]; nothing
//! here assumes a fixed dataset layout.

pub mod config;
pub mod papers;

pub use config::SourceConfig;
pub use papers::{PaperKey, PaperSource};
