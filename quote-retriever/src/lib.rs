//! Quote retrieval engine: lemma-normalized matching + TF-IDF/cosine ranking.
//!
//! This crate wires the pipeline end to end:
//! - query text → lemma sets → candidate documents ([`query`])
//! - candidates → best response line per document ([`scorer`])
//! - scored candidates → one unused response ([`select`])
//!
//! The [`Retriever`] facade owns all built state (dictionary, corpus, index,
//! TF-IDF table) and is the single entry point recommended for application
//! code. Per-session state lives in [`ChatSession`], owned by the caller.

mod config;
pub mod errors;
pub mod query;
pub mod scorer;
pub mod select;
mod session;

pub use config::RetrieverConfig;
pub use dialogue_index::Granularity;
pub use errors::{Result, RetrieverError};
pub use select::SelectionMode;
pub use session::ChatSession;

use dialogue_index::{Corpus, InvertedIndex, Signature, TfIdfTable, snapshot};
use morphology::{LemmaDictionary, Progress, StopwordSet};
use rand::Rng;
use tracing::{debug, info, warn};

/// One served response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    /// Whether this is the configured default response rather than a match.
    pub fallback: bool,
}

/// The retrieval engine: built once at startup, read-only while serving.
pub struct Retriever {
    cfg: RetrieverConfig,
    dictionary: LemmaDictionary,
    stopwords: StopwordSet,
    corpus: Corpus,
    index: InvertedIndex,
    tfidf: TfIdfTable,
}

impl Retriever {
    /// Builds the engine: dictionary load → corpus load → index and TF-IDF
    /// table, each restored from a fresh snapshot when possible and rebuilt
    /// (then re-stored) otherwise.
    ///
    /// # Errors
    /// Returns [`RetrieverError`] if the config is invalid, a source file is
    /// missing or malformed, or a rebuild fails. A stale, corrupt or missing
    /// snapshot is not an error; it is logged and recovered by rebuilding.
    pub fn bootstrap(cfg: RetrieverConfig, progress: &mut dyn Progress) -> Result<Self> {
        cfg.validate()?;
        info!(
            "bootstrapping retriever: corpus={}, {} granularity",
            cfg.corpus_path.display(),
            cfg.granularity.tag()
        );

        let dictionary = LemmaDictionary::load(&cfg.dictionary_path, progress)?;
        let stopwords = match &cfg.stopwords_path {
            Some(path) => StopwordSet::load(path)?,
            None => StopwordSet::empty(),
        };
        let corpus = Corpus::load(&cfg.corpus_path, cfg.granularity)?;

        let signature = Signature::of_file(&cfg.corpus_path, cfg.granularity.tag())?;
        let index_name = format!("inverted_index.{}", cfg.granularity.tag());
        let index = match snapshot::load::<InvertedIndex>(&cfg.cache_dir, &index_name, &signature) {
            Ok(index) => index,
            Err(e) => {
                warn!("index snapshot unusable ({e}), rebuilding");
                let index = InvertedIndex::build(&corpus, &dictionary, progress);
                if let Err(e) = snapshot::store(&cfg.cache_dir, &index_name, &signature, &index) {
                    warn!("failed to store index snapshot: {e}");
                }
                index
            }
        };

        let tfidf_name = format!("tfidf.{}", cfg.granularity.tag());
        let tfidf = match snapshot::load::<TfIdfTable>(&cfg.cache_dir, &tfidf_name, &signature) {
            Ok(table) => table,
            Err(e) => {
                warn!("tf-idf snapshot unusable ({e}), rebuilding");
                let table = TfIdfTable::build(&corpus, &dictionary, progress);
                if let Err(e) = snapshot::store(&cfg.cache_dir, &tfidf_name, &signature, &table) {
                    warn!("failed to store tf-idf snapshot: {e}");
                }
                table
            }
        };

        info!(
            "retriever ready: {} documents, {} indexed lemmas",
            corpus.len(),
            index.term_count()
        );
        Ok(Self {
            cfg,
            dictionary,
            stopwords,
            corpus,
            index,
            tfidf,
        })
    }

    /// Serves one query. Never fails: every degenerate case falls back to
    /// the configured default response.
    pub fn respond<R: Rng>(
        &self,
        session: &mut ChatSession,
        query_text: &str,
        rng: &mut R,
    ) -> Response {
        let terms = query::lemmatize_query(query_text, &self.dictionary, &self.stopwords);
        let mut candidates = query::match_candidates(&terms, &self.index);
        if self.cfg.filter_rare {
            query::filter_rare(&mut candidates);
        }
        if candidates.is_empty() {
            debug!("no candidates, answering with the default response");
            return Response {
                text: self.cfg.default_response.clone(),
                fallback: true,
            };
        }

        let scored: Vec<scorer::ScoredQuote> = candidates
            .keys()
            .filter_map(|&doc| {
                let document = self.corpus.get(doc)?;
                scorer::score_document(
                    doc,
                    document,
                    &terms,
                    &self.dictionary,
                    &self.tfidf,
                    self.cfg.choose_answer,
                )
            })
            .collect();
        if scored.is_empty() {
            return Response {
                text: self.cfg.default_response.clone(),
                fallback: true,
            };
        }

        let text = select::select(
            self.cfg.selection,
            &scored,
            session,
            &self.cfg.default_response,
            rng,
        );
        let fallback = text == self.cfg.default_response;
        Response { text, fallback }
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.cfg
    }
}
