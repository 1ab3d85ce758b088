use crate::index::{DocId, DocMeta};
use crate::{Error, Result};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

/// Descending score, then ascending id.
fn by_score_then_id(a: &(&DocId, f64), b: &(&DocId, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

/// All scored documents, best first.
pub fn rank(scores: &BTreeMap<DocId, f64>) -> Vec<(&DocId, f64)> {
    let mut ranked: Vec<(&DocId, f64)> = scores.iter().map(|(id, s)| (id, *s)).collect();
    ranked.sort_by(by_score_then_id);
    ranked
}

/// Broadens the ranking to every document sharing a classification code with
/// the top `depth` documents, then re-ranks that set by score.
///
/// Equal scores in the expanded set are ordered by ascending id.
pub fn expand(scores: &BTreeMap<DocId, f64>, docs: &BTreeMap<DocId, DocMeta>, depth: usize) -> Result<Vec<DocId>> {
    let mut codes: HashSet<&str> = HashSet::new();
    for (id, _) in rank(scores).into_iter().take(depth) {
        let meta = docs.get(id).ok_or_else(|| Error::MissingMetadata(id.clone()))?;
        codes.insert(meta.classification.as_str());
    }

    let mut expanded: Vec<(&DocId, f64)> = docs
        .iter()
        .filter(|(_, meta)| codes.contains(meta.classification.as_str()))
        .map(|(id, _)| (id, scores.get(id).copied().unwrap_or(0.0)))
        .collect();
    expanded.sort_by(by_score_then_id);

    tracing::info!(codes = codes.len(), results = expanded.len(), "expanded results by classification");
    Ok(expanded.into_iter().map(|(id, _)| id.clone()).collect())
}
