//! Inverted index: lemma → set of document identifiers.

use std::collections::{BTreeSet, HashMap};

use morphology::{LemmaDictionary, Progress, tokenize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::{Corpus, DocId};

static EMPTY_POSTINGS: BTreeSet<DocId> = BTreeSet::new();

/// Maps each base-form lemma to the documents containing it.
///
/// Invariant: a document id appears under lemma `L` iff `L` is a lemma of
/// some token appearing anywhere in that document. Rebuilding from the same
/// corpus and dictionary always yields the same mapping.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeSet<DocId>>,
    doc_count: u32,
}

impl InvertedIndex {
    /// Builds the index by lemmatizing every token of every document.
    pub fn build(
        corpus: &Corpus,
        dictionary: &LemmaDictionary,
        progress: &mut dyn Progress,
    ) -> Self {
        info!("building inverted index over {} documents", corpus.len());
        let mut postings: HashMap<String, BTreeSet<DocId>> = HashMap::new();

        progress.begin("inverted index", Some(corpus.len() as u64));
        for (id, document) in corpus.documents().iter().enumerate() {
            let id = id as DocId;
            for line in &document.lines {
                for token in tokenize(&line.text) {
                    for base in dictionary.lookup(&token) {
                        postings.entry(base.clone()).or_default().insert(id);
                    }
                }
            }
            progress.advance(1);
        }
        progress.finish();

        debug!("inverted index holds {} lemmas", postings.len());
        Self {
            postings,
            doc_count: corpus.len() as u32,
        }
    }

    /// Documents containing `lemma`; the empty set if the lemma is unknown.
    pub fn postings(&self, lemma: &str) -> &BTreeSet<DocId> {
        self.postings.get(lemma).unwrap_or(&EMPTY_POSTINGS)
    }

    /// Number of distinct indexed lemmas.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Number of documents the index was built over.
    pub fn doc_count(&self) -> u32 {
        self.doc_count
    }
}
