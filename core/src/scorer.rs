//! Two-field vector-space scoring.
//!
//! Documents carry lnc weights and are cosine-normalized by their stored
//! vector norm; query terms carry `(1 + log10 tf) * idf` and are left
//! unnormalized. The title query is matched against [`Field::Title`], the
//! description query against [`Field::Abstract`].

use crate::index::{DocId, Dictionary, Field, PerField};
use crate::normalizer::Normalizer;
use crate::persist::PostingsReader;
use crate::{Error, Result, SearchConfig};
use std::collections::{BTreeMap, HashMap};
use std::io::{Read, Seek};

/// Normalized query terms, one list per document field they are matched against.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub terms: PerField<Vec<String>>,
}

impl Query {
    pub fn new(title_terms: Vec<String>, description_terms: Vec<String>) -> Self {
        Self { terms: PerField::new(title_terms, description_terms) }
    }

    pub fn parse<N: Normalizer>(normalizer: &N, title: &str, description: &str) -> Self {
        Self::new(normalizer.normalize(title), normalizer.normalize(description))
    }
}

/// Query-side weight of a term seen `tf_query` times in a multi-term query.
pub fn query_term_weight(tf_query: usize, idf: f64) -> f64 {
    (1.0 + (tf_query as f64).log10()) * idf
}

pub struct QueryScorer<'a, R> {
    dictionary: &'a Dictionary,
    postings: &'a mut PostingsReader<R>,
    config: &'a SearchConfig,
}

impl<'a, R: Read + Seek> QueryScorer<'a, R> {
    pub fn new(dictionary: &'a Dictionary, postings: &'a mut PostingsReader<R>, config: &'a SearchConfig) -> Self {
        Self { dictionary, postings, config }
    }

    /// Dot product of query and document vectors for one field, before the
    /// document norm is applied. A single distinct query term scores each
    /// document by its raw stored weight.
    pub fn accumulate(&mut self, field: Field, terms: &[String]) -> Result<HashMap<DocId, f64>> {
        let mut tf_query: BTreeMap<&str, usize> = BTreeMap::new();
        for term in terms {
            *tf_query.entry(term.as_str()).or_insert(0) += 1;
        }
        let single_term = tf_query.len() == 1;

        let mut scores: HashMap<DocId, f64> = HashMap::new();
        for (term, tf) in tf_query {
            let Some(entry) = self.dictionary.lookup(field, term) else {
                tracing::debug!(?field, term, "query term not in dictionary");
                continue;
            };
            let q_weight = query_term_weight(tf, entry.idf);
            for p in self.postings.read_entry(entry)? {
                let contrib = if single_term { p.weight } else { p.weight * q_weight };
                *scores.entry(p.doc_id).or_insert(0.0) += contrib;
            }
        }
        Ok(scores)
    }

    /// Cosine-normalized scores for one field. Documents with a zero norm score 0.
    pub fn field_scores(&mut self, field: Field, terms: &[String]) -> Result<HashMap<DocId, f64>> {
        let mut scores = self.accumulate(field, terms)?;
        for (doc_id, score) in scores.iter_mut() {
            let meta = self
                .dictionary
                .docs
                .get(doc_id)
                .ok_or_else(|| Error::MissingMetadata(doc_id.clone()))?;
            let norm = meta.norm(field);
            *score = if norm > 0.0 { *score / norm } else { 0.0 };
        }
        Ok(scores)
    }

    /// Combined score for every document in the corpus, zero included.
    pub fn score(&mut self, query: &Query) -> Result<BTreeMap<DocId, f64>> {
        let title = self.field_scores(Field::Title, query.terms.get(Field::Title))?;
        let description = self.field_scores(Field::Abstract, query.terms.get(Field::Abstract))?;

        let combined: BTreeMap<DocId, f64> = self
            .dictionary
            .docs
            .keys()
            .map(|id| {
                let t = title.get(id).copied().unwrap_or(0.0);
                let d = description.get(id).copied().unwrap_or(0.0);
                (id.clone(), self.config.title_weight * t + self.config.description_weight * d)
            })
            .collect();

        tracing::debug!(
            title_hits = title.len(),
            description_hits = description.len(),
            num_docs = combined.len(),
            "scored query"
        );
        Ok(combined)
    }
}
