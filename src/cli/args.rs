//! Command line argument parsing for the Sentindex CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::corpus::{DocumentId, FlatId};

/// Sentindex - flat sentence addressing for paper corpora
#[derive(Parser, Debug, Clone)]
#[command(name = "sentindex")]
#[command(about = "Address, inspect and merge sentence-segmented paper corpora")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SentindexArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SentindexArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a corpus from a JSONL file of pre-split documents
    Build(BuildArgs),

    /// Show corpus statistics
    Info(InfoArgs),

    /// Print sentences by flat id
    Get(GetArgs),

    /// Resolve flat ids to (document, offset) locations
    Lookup(LookupArgs),

    /// Print a slice of sentences
    Slice(SliceArgs),

    /// Print all sentences of one document
    Sents(SentsArgs),

    /// Merge stored corpora into a new one
    Merge(MergeArgs),

    /// Inspect a directory of paper files
    Papers(PapersArgs),
}

/// Arguments for building a corpus
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// JSONL input, one `{"document_id": .., "sentences": [..]}` per line
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory to store the corpus in
    #[arg(short, long, value_name = "CORPUS_DIR")]
    pub output: PathBuf,

    /// Overwrite an existing corpus directory
    #[arg(long)]
    pub force: bool,
}

/// Arguments for corpus statistics
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    /// Path to the corpus directory
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus: PathBuf,

    /// Also check the flat index invariants
    #[arg(long)]
    pub validate: bool,
}

/// Arguments for sentence retrieval
#[derive(Parser, Debug, Clone)]
pub struct GetArgs {
    /// Path to the corpus directory
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus: PathBuf,

    /// Flat ids; negative ids count from the end
    #[arg(value_name = "FLAT_ID", required = true, allow_negative_numbers = true)]
    pub ids: Vec<FlatId>,
}

/// Arguments for flat id lookup
#[derive(Parser, Debug, Clone)]
pub struct LookupArgs {
    /// Path to the corpus directory
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus: PathBuf,

    /// Flat ids, in any order
    #[arg(value_name = "FLAT_ID", required = true, allow_negative_numbers = true)]
    pub ids: Vec<FlatId>,
}

/// Arguments for slicing
#[derive(Parser, Debug, Clone)]
pub struct SliceArgs {
    /// Path to the corpus directory
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus: PathBuf,

    /// First flat id (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<FlatId>,

    /// Last flat id (exclusive)
    #[arg(long, allow_negative_numbers = true)]
    pub stop: Option<FlatId>,

    /// Step between flat ids
    #[arg(long, allow_negative_numbers = true)]
    pub step: Option<FlatId>,
}

/// Arguments for per-document retrieval
#[derive(Parser, Debug, Clone)]
pub struct SentsArgs {
    /// Path to the corpus directory
    #[arg(value_name = "CORPUS_DIR")]
    pub corpus: PathBuf,

    /// Document id
    #[arg(value_name = "DOCUMENT_ID")]
    pub document_id: DocumentId,
}

/// Arguments for merging
#[derive(Parser, Debug, Clone)]
pub struct MergeArgs {
    /// Corpus directories, merged in the given order
    #[arg(value_name = "CORPUS_DIR", required = true)]
    pub shards: Vec<PathBuf>,

    /// Directory to store the merged corpus in
    #[arg(short, long, value_name = "CORPUS_DIR")]
    pub output: PathBuf,

    /// Overwrite an existing corpus directory
    #[arg(long)]
    pub force: bool,
}

/// Arguments for paper source inspection
#[derive(Parser, Debug, Clone)]
pub struct PapersArgs {
    /// Directory of paper files
    #[arg(long, env = "SENTINDEX_SOURCE_ROOT", value_name = "DIR")]
    pub root: PathBuf,

    /// Paper file extension
    #[arg(long, default_value = "json")]
    pub extension: String,

    /// Print the paper with this index
    #[arg(long, conflicts_with = "paper_id")]
    pub index: Option<DocumentId>,

    /// Print the paper with this id
    #[arg(long)]
    pub paper_id: Option<String>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
