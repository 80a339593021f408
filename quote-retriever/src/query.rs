//! Query lemmatization, candidate matching and coverage filtering.

use std::collections::{BTreeMap, BTreeSet};

use dialogue_index::{DocId, InvertedIndex};
use morphology::{LemmaDictionary, StopwordSet, tokenize};
use tracing::debug;

/// One query position: the surface token plus its candidate lemmas.
///
/// The lemma list is empty when the token is unknown to the dictionary;
/// such positions take part in nothing downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerm {
    pub surface: String,
    pub lemmas: Vec<String>,
}

/// Coverage of candidate documents: which query positions each one matches.
pub type CandidateSet = BTreeMap<DocId, BTreeSet<usize>>;

/// Tokenizes `text`, drops stopwords and attaches lemma sets.
pub fn lemmatize_query(
    text: &str,
    dictionary: &LemmaDictionary,
    stopwords: &StopwordSet,
) -> Vec<QueryTerm> {
    tokenize(text)
        .into_iter()
        .filter(|token| !stopwords.contains(token))
        .map(|surface| {
            let lemmas = dictionary.lookup(&surface).to_vec();
            QueryTerm { surface, lemmas }
        })
        .collect()
}

/// Finds every document touched by some query position and records which
/// positions it matches.
///
/// For position `i`, the postings of all its lemmas are unioned; each
/// document in that union gains `i` in its coverage set. Positions with no
/// lemmas contribute nothing.
pub fn match_candidates(terms: &[QueryTerm], index: &InvertedIndex) -> CandidateSet {
    let mut candidates = CandidateSet::new();
    for (position, term) in terms.iter().enumerate() {
        let mut touched: BTreeSet<DocId> = BTreeSet::new();
        for lemma in &term.lemmas {
            touched.extend(index.postings(lemma).iter().copied());
        }
        for doc in touched {
            candidates.entry(doc).or_default().insert(position);
        }
    }
    debug!("matched {} candidate documents", candidates.len());
    candidates
}

/// Drops single-position matches when any candidate covers more than one
/// query position, preferring broader matches over one-keyword coincidences.
pub fn filter_rare(candidates: &mut CandidateSet) {
    if candidates.values().any(|coverage| coverage.len() > 1) {
        candidates.retain(|_, coverage| coverage.len() > 1);
    }
}
