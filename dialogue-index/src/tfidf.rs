//! TF-IDF weighting table over document lemmas.
//!
//! `weight(d, L) = TF(d, L) × IDF(L)` with linear term frequency and the
//! standard `ln(N / df)` inverse document frequency. The table is sparse: a
//! lemma absent from a document has weight 0 and is never materialized.

use std::collections::{HashMap, HashSet};

use morphology::{LemmaDictionary, Progress, tokenize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::corpus::{Corpus, DocId};

/// Sparse `document → (lemma → weight)` table, precomputed once per corpus.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TfIdfTable {
    weights: Vec<HashMap<String, f64>>,
}

impl TfIdfTable {
    /// Builds the table from the corpus.
    ///
    /// Term frequency of lemma `L` in document `d` counts the tokens of `d`
    /// whose lemma set contains `L`, divided by the total token count of
    /// `d`. Document frequency of `L` counts documents with at least one
    /// such token, so it is always ≥ 1 wherever a weight is materialized.
    pub fn build(
        corpus: &Corpus,
        dictionary: &LemmaDictionary,
        progress: &mut dyn Progress,
    ) -> Self {
        info!("building tf-idf table over {} documents", corpus.len());
        let total_docs = corpus.len() as f64;

        // First pass: per-document lemma counts and corpus-wide document
        // frequencies.
        let mut counts: Vec<(HashMap<String, u32>, u32)> = Vec::with_capacity(corpus.len());
        let mut doc_frequency: HashMap<String, u32> = HashMap::new();

        progress.begin("tf-idf table", Some(corpus.len() as u64));
        for document in corpus.documents() {
            let mut lemma_counts: HashMap<String, u32> = HashMap::new();
            let mut token_total: u32 = 0;
            for line in &document.lines {
                for token in tokenize(&line.text) {
                    token_total += 1;
                    // One token counts once per distinct lemma, even when the
                    // dictionary lists that lemma twice for the surface form.
                    let distinct: HashSet<&String> = dictionary.lookup(&token).iter().collect();
                    for base in distinct {
                        *lemma_counts.entry(base.clone()).or_insert(0) += 1;
                    }
                }
            }
            for lemma in lemma_counts.keys() {
                *doc_frequency.entry(lemma.clone()).or_insert(0) += 1;
            }
            counts.push((lemma_counts, token_total));
            progress.advance(1);
        }

        // Second pass: fold counts into weights.
        let weights = counts
            .into_iter()
            .map(|(lemma_counts, token_total)| {
                if token_total == 0 {
                    return HashMap::new();
                }
                lemma_counts
                    .into_iter()
                    .map(|(lemma, count)| {
                        let tf = f64::from(count) / f64::from(token_total);
                        let df = f64::from(doc_frequency[&lemma]);
                        let idf = (total_docs / df).ln();
                        (lemma, tf * idf)
                    })
                    .collect()
            })
            .collect();
        progress.finish();

        debug!("tf-idf table covers {} lemmas", doc_frequency.len());
        Self { weights }
    }

    /// Weight of `lemma` in document `doc`; 0.0 for any absent pair.
    pub fn weight(&self, doc: DocId, lemma: &str) -> f64 {
        self.weights
            .get(doc as usize)
            .and_then(|w| w.get(lemma))
            .copied()
            .unwrap_or(0.0)
    }

    /// Number of documents the table was built over.
    pub fn doc_count(&self) -> usize {
        self.weights.len()
    }
}
