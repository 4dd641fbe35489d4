//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SentindexArgs};
use crate::corpus::{CorpusStats, DocumentId, FlatId, SentenceLocation};
use crate::error::Result;

/// Result of building or merging a corpus.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredCorpusResult {
    pub path: String,
    pub stats: CorpusStats,
    pub duration_ms: u64,
}

/// Corpus statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct CorpusInfo {
    pub path: String,
    pub stats: CorpusStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
}

/// One retrieved sentence.
#[derive(Debug, Serialize, Deserialize)]
pub struct SentenceEntry {
    pub flat_id: FlatId,
    pub sentence: String,
}

/// Sentences returned by `get` and `slice`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SentenceList {
    pub sentences: Vec<SentenceEntry>,
}

/// Locations returned by `lookup`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResult {
    pub locations: Vec<SentenceLocation>,
}

/// Sentences of one document.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentSentences {
    pub document_id: DocumentId,
    pub sentences: Vec<String>,
}

/// Summary of a paper source.
#[derive(Debug, Serialize, Deserialize)]
pub struct SourceSummary {
    pub source: String,
    pub num_papers: usize,
    pub first_papers: Vec<(DocumentId, String)>,
}

/// Print a result in the selected format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &SentindexArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: Serialize>(message: &str, result: &T, args: &SentindexArgs) -> Result<()> {
    if args.verbosity() > 0 && !message.is_empty() {
        println!("{message}");
        println!();
    }

    let value = serde_json::to_value(result)?;
    output_generic_human(&value, 0);
    Ok(())
}

fn output_json<T: Serialize>(result: &T, args: &SentindexArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}

fn output_generic_human(value: &serde_json::Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                if val.is_object() || val.is_array() {
                    println!("{indent}{key}:");
                    output_generic_human(val, depth + 1);
                } else {
                    println!("{indent}{key}: {}", format_value(val));
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                if item.is_object() {
                    println!("{indent}-");
                    output_generic_human(item, depth + 1);
                } else {
                    println!("{indent}- {}", format_value(item));
                }
            }
        }
        other => println!("{indent}{}", format_value(other)),
    }
}

/// Format a scalar JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Array(arr) => arr
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        serde_json::Value::Object(_) => value.to_string(),
    }
}
