//! Command implementations for the Sentindex CLI.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use ahash::AHashSet;
use log::{debug, info};
use serde::Deserialize;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus::persist::open_existing;
use crate::corpus::{CorpusBuilder, DocumentId, FlatCorpus, SentenceSet, merge_stored};
use crate::error::{Result, SentindexError};
use crate::source::{PaperKey, PaperSource, SourceConfig};
use crate::storage::{FileStorage, Storage};

/// How many papers `papers` lists when no single paper is requested.
const PAPER_PREVIEW: usize = 10;

/// Execute a CLI command.
pub fn execute_command(args: SentindexArgs) -> Result<()> {
    match &args.command {
        Command::Build(build_args) => build_corpus(build_args, &args),
        Command::Info(info_args) => show_info(info_args, &args),
        Command::Get(get_args) => get_sentences(get_args, &args),
        Command::Lookup(lookup_args) => lookup_ids(lookup_args, &args),
        Command::Slice(slice_args) => slice_corpus(slice_args, &args),
        Command::Sents(sents_args) => document_sentences(sents_args, &args),
        Command::Merge(merge_args) => merge_corpora(merge_args, &args),
        Command::Papers(papers_args) => inspect_papers(papers_args, &args),
    }
}

/// One input line of `build`.
#[derive(Debug, Deserialize)]
struct BuildRecord {
    document_id: DocumentId,
    sentences: Vec<String>,
}

fn build_corpus(args: &BuildArgs, cli_args: &SentindexArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;
    let start_time = Instant::now();

    let reader = BufReader::new(File::open(&args.input)?);
    let mut records = Vec::new();
    let mut seen = AHashSet::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: BuildRecord = serde_json::from_str(&line).map_err(|e| {
            SentindexError::invalid_argument(format!("line {}: {e}", line_num + 1))
        })?;
        if !seen.insert(record.document_id) {
            return Err(SentindexError::invalid_argument(format!(
                "line {}: document {} appears more than once",
                line_num + 1,
                record.document_id
            )));
        }
        records.push(record);
    }
    debug!("read {} documents from {}", records.len(), args.input.display());

    let document_ids = records.iter().map(|r| r.document_id).collect();
    let mut builder = CorpusBuilder::new(SentenceSet::with_document_ids(document_ids));
    for record in records {
        builder.add_document(record.document_id, record.sentences)?;
    }
    let corpus = builder.build()?;
    corpus.to_disk(&args.output)?;
    info!("built corpus at {}", args.output.display());

    output_result(
        "Corpus built successfully",
        &StoredCorpusResult {
            path: args.output.to_string_lossy().to_string(),
            stats: corpus.stats(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

fn show_info(args: &InfoArgs, cli_args: &SentindexArgs) -> Result<()> {
    let corpus = FlatCorpus::from_disk(&args.corpus)?;
    let valid = args.validate.then(|| match corpus.validate() {
        Ok(()) => true,
        Err(e) => {
            if cli_args.verbosity() > 0 {
                eprintln!("{e}");
            }
            false
        }
    });

    output_result(
        &corpus.to_string(),
        &CorpusInfo {
            path: args.corpus.to_string_lossy().to_string(),
            stats: corpus.stats(),
            valid,
        },
        cli_args,
    )
}

fn get_sentences(args: &GetArgs, cli_args: &SentindexArgs) -> Result<()> {
    let corpus = FlatCorpus::from_disk(&args.corpus)?;
    let sentences = args
        .ids
        .iter()
        .map(|&flat_id| {
            Ok(SentenceEntry {
                flat_id,
                sentence: corpus.get_sentence(flat_id)?.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    output_result("", &SentenceList { sentences }, cli_args)
}

fn lookup_ids(args: &LookupArgs, cli_args: &SentindexArgs) -> Result<()> {
    let corpus = FlatCorpus::from_disk(&args.corpus)?;
    let locations = corpus.lookup(&args.ids)?;
    output_result("", &LookupResult { locations }, cli_args)
}

fn slice_corpus(args: &SliceArgs, cli_args: &SentindexArgs) -> Result<()> {
    let corpus = FlatCorpus::from_disk(&args.corpus)?;
    let positions = crate::corpus::flat::slice_positions(
        corpus.flat_index().len(),
        args.start,
        args.stop,
        args.step,
    )?;
    let sentences = positions
        .into_iter()
        .map(|pos| {
            let flat_id = pos as i64;
            Ok(SentenceEntry {
                flat_id,
                sentence: corpus.get_sentence(flat_id)?.to_string(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    output_result("", &SentenceList { sentences }, cli_args)
}

fn document_sentences(args: &SentsArgs, cli_args: &SentindexArgs) -> Result<()> {
    let corpus = FlatCorpus::from_disk(&args.corpus)?;
    let sentences = corpus.sentences_of(args.document_id)?.to_vec();
    output_result(
        "",
        &DocumentSentences {
            document_id: args.document_id,
            sentences,
        },
        cli_args,
    )
}

fn merge_corpora(args: &MergeArgs, cli_args: &SentindexArgs) -> Result<()> {
    ensure_writable(&args.output, args.force)?;
    let start_time = Instant::now();

    let shards = args
        .shards
        .iter()
        .map(|path| open_existing(path))
        .collect::<Result<Vec<FileStorage>>>()?;
    let storages: Vec<&dyn Storage> = shards.iter().map(|s| s as &dyn Storage).collect();

    let merged = merge_stored(&storages)?;
    merged.to_disk(&args.output)?;
    info!(
        "merged {} shards into {}",
        shards.len(),
        args.output.display()
    );

    output_result(
        "Corpora merged successfully",
        &StoredCorpusResult {
            path: args.output.to_string_lossy().to_string(),
            stats: merged.stats(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

fn inspect_papers(args: &PapersArgs, cli_args: &SentindexArgs) -> Result<()> {
    let config = SourceConfig::new(&args.root).with_extension(args.extension.clone());
    let source = PaperSource::open(config)?;

    let key = match (args.index, &args.paper_id) {
        (Some(index), _) => Some(PaperKey::Index(index)),
        (None, Some(paper_id)) => Some(PaperKey::Id(paper_id.clone())),
        (None, None) => None,
    };

    match key {
        Some(key) => {
            let paper = source.load_paper(key)?;
            let json = if cli_args.pretty || cli_args.output_format == OutputFormat::Human {
                serde_json::to_string_pretty(&paper)?
            } else {
                serde_json::to_string(&paper)?
            };
            println!("{json}");
            Ok(())
        }
        None => {
            let first_papers = source
                .paper_ids()
                .iter()
                .take(PAPER_PREVIEW)
                .enumerate()
                .map(|(i, id)| (i as DocumentId + 1, id.clone()))
                .collect();
            output_result(
                &source.to_string(),
                &SourceSummary {
                    source: source.source_name(),
                    num_papers: source.num_papers(),
                    first_papers,
                },
                cli_args,
            )
        }
    }
}

/// Refuse to overwrite a non-empty directory unless forced.
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.is_dir() && std::fs::read_dir(path)?.next().is_some() && !force {
        return Err(SentindexError::invalid_argument(format!(
            "{} already exists and is not empty. Use --force to overwrite.",
            path.display()
        )));
    }
    Ok(())
}
