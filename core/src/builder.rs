use crate::index::{DocId, DocMeta, Field, FieldPostings, PerField, Posting};
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};

/// A normalized document ready for indexing.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub id: DocId,
    pub title_terms: Vec<String>,
    pub abstract_terms: Vec<String>,
    pub classification: String,
}

impl SourceDocument {
    fn terms(&self, field: Field) -> &[String] {
        match field {
            Field::Title => &self.title_terms,
            Field::Abstract => &self.abstract_terms,
        }
    }
}

/// Documents in strictly ascending [`DocId`] order.
///
/// Appending postings in this order is what keeps every postings list sorted
/// without a sort step, so the order is checked once here.
#[derive(Debug, Default)]
pub struct SortedDocuments {
    docs: Vec<SourceDocument>,
}

impl SortedDocuments {
    pub fn new(docs: Vec<SourceDocument>) -> Result<Self> {
        let mut sorted = Self::default();
        for doc in docs {
            sorted.push(doc)?;
        }
        Ok(sorted)
    }

    pub fn push(&mut self, doc: SourceDocument) -> Result<()> {
        if let Some(last) = self.docs.last() {
            if doc.id <= last.id {
                return Err(Error::UnsortedDocuments { previous: last.id.clone(), current: doc.id });
            }
        }
        self.docs.push(doc);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Output of [`IndexBuilder::build`].
#[derive(Debug, Default)]
pub struct BuiltIndex {
    pub postings: PerField<FieldPostings>,
    pub docs: BTreeMap<DocId, DocMeta>,
}

impl BuiltIndex {
    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }
}

/// lnc document weight for a term seen `tf` times (tf >= 1).
pub fn lnc_weight(tf: usize) -> f64 {
    1.0 + (tf as f64).log10()
}

#[derive(Debug, Default)]
pub struct IndexBuilder;

impl IndexBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, docs: SortedDocuments) -> BuiltIndex {
        // term -> one doc id per occurrence, in document order
        let mut raw: PerField<HashMap<String, Vec<DocId>>> = PerField::default();
        let mut classifications: Vec<(DocId, String)> = Vec::with_capacity(docs.len());

        for doc in docs.docs {
            for field in Field::ALL {
                let field_raw = raw.get_mut(field);
                for term in doc.terms(field) {
                    match field_raw.get_mut(term) {
                        Some(ids) => ids.push(doc.id.clone()),
                        None => {
                            field_raw.insert(term.clone(), vec![doc.id.clone()]);
                        }
                    }
                }
            }
            classifications.push((doc.id, doc.classification));
        }

        let postings = PerField::new(weigh(raw.title), weigh(raw.r#abstract));
        let title_norms = vector_norms(&postings.title);
        let abstract_norms = vector_norms(&postings.r#abstract);

        let docs: BTreeMap<DocId, DocMeta> = classifications
            .into_iter()
            .map(|(id, classification)| {
                let meta = DocMeta {
                    title_norm: title_norms.get(&id).copied().unwrap_or(0.0),
                    abstract_norm: abstract_norms.get(&id).copied().unwrap_or(0.0),
                    classification,
                };
                (id, meta)
            })
            .collect();

        tracing::info!(
            num_docs = docs.len(),
            title_terms = postings.title.len(),
            abstract_terms = postings.r#abstract.len(),
            "built inverted index"
        );
        BuiltIndex { postings, docs }
    }
}

/// Collapses runs of equal doc ids into one lnc-weighted posting.
fn weigh(raw: HashMap<String, Vec<DocId>>) -> FieldPostings {
    raw.into_iter()
        .map(|(term, ids)| {
            let mut postings: Vec<Posting> = Vec::new();
            let mut run = 0usize;
            let mut iter = ids.into_iter().peekable();
            while let Some(id) = iter.next() {
                run += 1;
                if iter.peek() != Some(&id) {
                    postings.push(Posting { doc_id: id, weight: lnc_weight(run) });
                    run = 0;
                }
            }
            (term, postings)
        })
        .collect()
}

/// Euclidean length of each document's lnc vector for one field.
fn vector_norms(postings: &FieldPostings) -> HashMap<DocId, f64> {
    let mut sum_squares: HashMap<DocId, f64> = HashMap::new();
    for plist in postings.values() {
        for p in plist {
            *sum_squares.entry(p.doc_id.clone()).or_insert(0.0) += p.weight * p.weight;
        }
    }
    sum_squares.into_iter().map(|(id, s)| (id, s.sqrt())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &[&str], abs: &[&str], ipc: &str) -> SourceDocument {
        SourceDocument {
            id: DocId::new(id).unwrap(),
            title_terms: title.iter().map(|s| s.to_string()).collect(),
            abstract_terms: abs.iter().map(|s| s.to_string()).collect(),
            classification: ipc.to_string(),
        }
    }

    #[test]
    fn rejects_out_of_order_and_duplicate_ids() {
        let err = SortedDocuments::new(vec![doc("2", &[], &[], "A"), doc("1", &[], &[], "A")]);
        assert!(matches!(err, Err(Error::UnsortedDocuments { .. })));
        let dup = SortedDocuments::new(vec![doc("1", &[], &[], "A"), doc("1", &[], &[], "A")]);
        assert!(dup.is_err());
    }

    #[test]
    fn groups_repeated_terms_into_log_weights() {
        let docs = SortedDocuments::new(vec![
            doc("1", &["alpha"], &["gear", "gear", "gear", "gear", "gear", "gear", "gear", "gear", "gear", "gear"], "A"),
            doc("2", &["alpha", "beta"], &["gear"], "B"),
        ])
        .unwrap();
        let built = IndexBuilder::new().build(docs);

        let gear = &built.postings.r#abstract["gear"];
        assert_eq!(gear.len(), 2);
        assert_eq!(gear[0].doc_id.as_str(), "1");
        assert!((gear[0].weight - 2.0).abs() < 1e-12);
        assert!((gear[1].weight - 1.0).abs() < 1e-12);

        let alpha = &built.postings.title["alpha"];
        let ids: Vec<&str> = alpha.iter().map(|p| p.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn norms_default_to_zero_for_empty_fields() {
        let docs = SortedDocuments::new(vec![
            doc("1", &["alpha", "beta"], &[], "A"),
            doc("2", &[], &[], "B"),
        ])
        .unwrap();
        let built = IndexBuilder::new().build(docs);
        let d1 = &built.docs[&DocId::new("1").unwrap()];
        assert!((d1.title_norm - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(d1.abstract_norm, 0.0);
        let d2 = &built.docs[&DocId::new("2").unwrap()];
        assert_eq!(d2.title_norm, 0.0);
        assert_eq!(d2.classification, "B");
    }
}
