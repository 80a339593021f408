//! Unified error type for retriever construction.
//!
//! Serving never fails: unknown tokens, empty candidate sets and exhausted
//! pools all degrade to the configured default response. Errors only arise
//! while the engine is being built.

use thiserror::Error;

/// Top-level error for `quote-retriever` operations.
#[derive(Debug, Error)]
pub enum RetrieverError {
    /// Dictionary or stopword loading failed.
    #[error(transparent)]
    Morphology(#[from] morphology::MorphologyError),

    /// Corpus loading, index building or snapshot handling failed.
    #[error(transparent)]
    Index(#[from] dialogue_index::IndexError),

    /// Invalid configuration.
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RetrieverError>;
