//! Runtime configuration for the retriever.

use std::path::PathBuf;

use dialogue_index::Granularity;

use crate::errors::{Result, RetrieverError};
use crate::select::SelectionMode;

/// Configuration for building and serving a [`Retriever`](crate::Retriever).
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// `base;surface;tags` lemma dictionary file.
    pub dictionary_path: PathBuf,
    /// Dialogue corpus file.
    pub corpus_path: PathBuf,
    /// Optional comma-separated stopword file.
    pub stopwords_path: Option<PathBuf>,
    /// Directory for index and tf-idf snapshots.
    pub cache_dir: PathBuf,
    /// Response emitted when nothing matches or every pool is exhausted.
    pub default_response: String,
    /// How one response is picked from the scored candidates.
    pub selection: SelectionMode,
    /// Unit of retrieval: whole dialogues or single lines.
    pub granularity: Granularity,
    /// Drop candidates matching a single query position when broader
    /// matches exist.
    pub filter_rare: bool,
    /// Answer mode: emit the line after the best-matching prefix.
    pub choose_answer: bool,
}

impl RetrieverConfig {
    /// Creates a sane default config for the given dictionary and corpus.
    pub fn new_default(
        dictionary_path: impl Into<PathBuf>,
        corpus_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            dictionary_path: dictionary_path.into(),
            corpus_path: corpus_path.into(),
            stopwords_path: None,
            cache_dir: PathBuf::from("cache"),
            default_response: "Jeden rabin powie tak, a inny powie nie.".to_string(),
            selection: SelectionMode::Randomized,
            granularity: Granularity::Dialogue,
            filter_rare: true,
            choose_answer: false,
        }
    }

    /// Validates config values.
    ///
    /// # Errors
    /// Returns [`RetrieverError::Config`] on the first invalid value.
    pub fn validate(&self) -> Result<()> {
        if self.dictionary_path.as_os_str().is_empty() {
            return Err(RetrieverError::Config("dictionary_path is empty".into()));
        }
        if self.corpus_path.as_os_str().is_empty() {
            return Err(RetrieverError::Config("corpus_path is empty".into()));
        }
        if self.cache_dir.as_os_str().is_empty() {
            return Err(RetrieverError::Config("cache_dir is empty".into()));
        }
        if self.default_response.trim().is_empty() {
            return Err(RetrieverError::Config("default_response is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let cfg = RetrieverConfig::new_default("dict.txt", "corpus.txt");
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.selection, SelectionMode::Randomized);
        assert!(cfg.filter_rare);
    }

    #[test]
    fn empty_paths_are_rejected() {
        let mut cfg = RetrieverConfig::new_default("", "corpus.txt");
        assert!(cfg.validate().is_err());

        cfg = RetrieverConfig::new_default("dict.txt", "corpus.txt");
        cfg.default_response = "  ".into();
        assert!(cfg.validate().is_err());
    }
}
