//! Two-field vector-space search over a fixed patent corpus.
//!
//! Build time: [`builder::IndexBuilder`] turns sorted, normalized documents into
//! per-field weighted postings, and [`persist::write_postings`] lays them out in a
//! postings file plus a [`Dictionary`].
//!
//! Query time: [`scorer::QueryScorer`] reads postings on demand and produces a
//! combined score per document, which [`expander::expand`] broadens by
//! classification code.

pub mod builder;
pub mod config;
pub mod corpus;
pub mod error;
pub mod expander;
pub mod index;
pub mod normalizer;
pub mod persist;
pub mod scorer;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use index::{DocId, DocMeta, Dictionary, Field, PerField, Posting, PostingsEntry};
pub use normalizer::{EnglishNormalizer, Normalizer};
