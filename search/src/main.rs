use anyhow::Result;
use clap::Parser;
use patsearch_core::SearchConfig;
use patsearch_search::{run_query_file, IndexFiles};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "patsearch-search")]
#[command(about = "Rank patents for an information need", long_about = None)]
struct Args {
    /// Dictionary file written by the indexer
    #[arg(short = 'd', long = "dictionary")]
    dictionary: PathBuf,
    /// Postings file written by the indexer
    #[arg(short = 'p', long = "postings")]
    postings: PathBuf,
    /// Query (information need) XML file
    #[arg(short = 'q', long = "query")]
    query: PathBuf,
    /// Output file for the ranked document ids
    #[arg(short = 'o', long = "output")]
    output: PathBuf,
    /// JSON file overriding search defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Top-ranked documents whose classification codes seed expansion
    #[arg(long)]
    expansion_depth: Option<usize>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SearchConfig::from_json_file(path)?,
        None => SearchConfig::default(),
    };
    if let Some(depth) = args.expansion_depth {
        config.expansion_depth = depth;
    }

    let index = IndexFiles { dictionary: args.dictionary, postings: args.postings };
    let hits = run_query_file(&index, &args.query, &args.output, &config)?;
    tracing::info!(hits, output = %args.output.display(), "search complete");
    Ok(())
}
