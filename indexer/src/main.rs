use anyhow::{anyhow, Context, Result};
use clap::Parser;
use patsearch_core::builder::{IndexBuilder, SortedDocuments};
use patsearch_core::corpus::PatentRecord;
use patsearch_core::persist::{save_dictionary, write_postings_file};
use patsearch_core::{DocId, Dictionary, EnglishNormalizer};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "patsearch-index")]
#[command(about = "Build the title/abstract inverted index for a patent corpus", long_about = None)]
struct Cli {
    /// Directory holding one XML file per patent
    #[arg(short = 'i', long = "input")]
    input: PathBuf,
    /// Output dictionary file (.json for JSON, anything else for bincode)
    #[arg(short = 'd', long = "dictionary")]
    dictionary: PathBuf,
    /// Output postings file
    #[arg(short = 'p', long = "postings")]
    postings: PathBuf,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    build_index(&cli.input, &cli.dictionary, &cli.postings)
}

/// Regular files directly under `dir`, sorted by file name.
fn list_documents(dir: &Path) -> Result<Vec<(DocId, PathBuf)>> {
    let mut docs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| anyhow!("document file name is not valid UTF-8: {}", entry.path().display()))?
            .to_string();
        docs.push((DocId::new(name)?, entry.into_path()));
    }
    Ok(docs)
}

fn build_index(input: &Path, dictionary_path: &Path, postings_path: &Path) -> Result<()> {
    let files = list_documents(input)?;
    tracing::info!(num_docs = files.len(), input = %input.display(), "found documents");

    let normalizer = EnglishNormalizer;
    let mut docs = SortedDocuments::default();
    for (doc_id, path) in files {
        let record = PatentRecord::from_file(&path).with_context(|| format!("reading {}", path.display()))?;
        docs.push(record.into_source(doc_id, &normalizer))?;
    }

    let built = IndexBuilder::new().build(docs);

    let terms = write_postings_file(postings_path, &built.postings, built.num_docs())
        .with_context(|| format!("writing postings to {}", postings_path.display()))?;
    tracing::info!(postings = %postings_path.display(), "wrote postings");

    let dictionary = Dictionary { docs: built.docs, terms };
    save_dictionary(dictionary_path, &dictionary)
        .with_context(|| format!("writing dictionary to {}", dictionary_path.display()))?;
    tracing::info!(dictionary = %dictionary_path.display(), "index build complete");
    Ok(())
}
