use crate::index::DocId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("bincode error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Build input must be strictly ascending by document id.
    #[error("documents out of order: {current} follows {previous}")]
    UnsortedDocuments { previous: DocId, current: DocId },

    #[error("invalid document id {id:?}: {reason}")]
    InvalidDocId { id: String, reason: &'static str },

    #[error("malformed postings record at offset {offset}: {reason}")]
    MalformedPostings { offset: u64, reason: String },

    /// Postings and dictionary are not products of the same build.
    #[error("document {0} has postings but no metadata")]
    MissingMetadata(DocId),

    #[error("malformed XML record: {0}")]
    MalformedRecord(String),
}
