use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Opaque, totally ordered document identifier (the source file name).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocId(String);

impl DocId {
    /// Separator between id and weight inside a postings record.
    pub const FIELD_SEPARATOR: char = ',';

    pub fn new(id: impl Into<String>) -> crate::Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(crate::Error::InvalidDocId { id, reason: "empty" });
        }
        if id.contains(Self::FIELD_SEPARATOR) {
            return Err(crate::Error::InvalidDocId { id, reason: "contains ','" });
        }
        if id.chars().any(char::is_whitespace) {
            return Err(crate::Error::InvalidDocId { id, reason: "contains whitespace" });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Indexed document field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Title,
    Abstract,
}

impl Field {
    pub const ALL: [Field; 2] = [Field::Title, Field::Abstract];
}

/// One value per [`Field`], replacing string-keyed field lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerField<T> {
    pub title: T,
    pub r#abstract: T,
}

impl<T> PerField<T> {
    pub fn new(title: T, r#abstract: T) -> Self {
        Self { title, r#abstract }
    }

    pub fn get(&self, field: Field) -> &T {
        match field {
            Field::Title => &self.title,
            Field::Abstract => &self.r#abstract,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut T {
        match field {
            Field::Title => &mut self.title,
            Field::Abstract => &mut self.r#abstract,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // lnc weight, 1 + log10(tf)
}

/// Term -> postings sorted by doc_id. Ordered so that writes are reproducible.
pub type FieldPostings = BTreeMap<String, Vec<Posting>>;

/// Where a term's postings record lives in the postings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostingsEntry {
    pub offset: u64,
    /// Record length in bytes, excluding the trailing newline.
    pub length: u64,
    pub idf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMeta {
    pub title_norm: f64,
    pub abstract_norm: f64,
    pub classification: String,
}

impl DocMeta {
    pub fn norm(&self, field: Field) -> f64 {
        match field {
            Field::Title => self.title_norm,
            Field::Abstract => self.abstract_norm,
        }
    }
}

/// Everything loaded into memory at query time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dictionary {
    pub docs: BTreeMap<DocId, DocMeta>,
    pub terms: PerField<HashMap<String, PostingsEntry>>,
}

impl Dictionary {
    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn lookup(&self, field: Field, term: &str) -> Option<&PostingsEntry> {
        self.terms.get(field).get(term)
    }
}
