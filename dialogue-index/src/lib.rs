//! Corpus model, inverted index, TF-IDF table and their disk snapshots.
//!
//! The shape of the data is fixed for the lifetime of a run: the corpus is
//! loaded once, the index and the TF-IDF table are built once (or restored
//! from a snapshot keyed by a freshness signature of the corpus) and are
//! read-only afterwards.

pub mod corpus;
pub mod errors;
mod index;
pub mod snapshot;
mod tfidf;

pub use corpus::{Corpus, DocId, Document, Granularity, Line};
pub use errors::{IndexError, Result};
pub use index::InvertedIndex;
pub use snapshot::Signature;
pub use tfidf::TfIdfTable;
