use anyhow::{Context, Result};
use patsearch_core::corpus::InformationNeed;
use patsearch_core::expander::expand;
use patsearch_core::persist::{load_dictionary, PostingsReader};
use patsearch_core::scorer::{Query, QueryScorer};
use patsearch_core::{DocId, EnglishNormalizer, Normalizer, SearchConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Files produced by the indexer.
pub struct IndexFiles {
    pub dictionary: PathBuf,
    pub postings: PathBuf,
}

/// Scores `need` against the index and returns the expanded ranking.
pub fn search<N: Normalizer>(
    index: &IndexFiles,
    need: &InformationNeed,
    normalizer: &N,
    config: &SearchConfig,
) -> Result<Vec<DocId>> {
    let dictionary = load_dictionary(&index.dictionary)
        .with_context(|| format!("loading dictionary {}", index.dictionary.display()))?;
    let mut postings = PostingsReader::open(&index.postings)
        .with_context(|| format!("opening postings {}", index.postings.display()))?;
    tracing::info!(num_docs = dictionary.num_docs(), "loaded dictionary");

    let query = Query::parse(normalizer, &need.title, &need.description);
    let scores = QueryScorer::new(&dictionary, &mut postings, config).score(&query)?;
    Ok(expand(&scores, &dictionary.docs, config.expansion_depth)?)
}

/// One line of whitespace-separated ids with `suffix` removed where present.
pub fn format_results(results: &[DocId], suffix: &str) -> String {
    results
        .iter()
        .map(|id| id.as_str().strip_suffix(suffix).unwrap_or(id.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Runs a query file end to end and writes the result line to `output`.
pub fn run_query_file(index: &IndexFiles, query_path: &Path, output: &Path, config: &SearchConfig) -> Result<usize> {
    let need = InformationNeed::from_file(query_path)
        .with_context(|| format!("reading query {}", query_path.display()))?;
    let results = search(index, &need, &EnglishNormalizer, config)?;
    let mut line = format_results(&results, &config.doc_id_suffix);
    line.push('\n');
    fs::write(output, line).with_context(|| format!("writing results to {}", output.display()))?;
    Ok(results.len())
}
