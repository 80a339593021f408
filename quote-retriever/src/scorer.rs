//! Incremental cosine scoring of candidate documents.
//!
//! For each candidate the query is projected into that document's TF-IDF
//! space (weights are document-specific, so the query vector is rebuilt per
//! candidate). The document is then scanned prefix by prefix: after each
//! line the cosine similarity between the cumulative prefix vector and the
//! query vector is evaluated, and the earliest maximum wins. A response that
//! best matches the query *together with everything said before it* is
//! preferred, so multi-turn context influences which single line surfaces.

use std::collections::{HashMap, HashSet};

use dialogue_index::{DocId, Document, TfIdfTable};
use morphology::{LemmaDictionary, tokenize};

use crate::query::QueryTerm;

/// One scored response candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredQuote {
    pub doc: DocId,
    /// Index of the emitted line within the document.
    pub line: usize,
    /// Raw form of the emitted line, speaker label included.
    pub text: String,
    /// Cosine similarity of the best prefix, in `[0, 1]`.
    pub score: f64,
}

/// Highest-weight lemma of a token in the given document, if it has any.
fn best_lemma<'d>(
    doc: DocId,
    lemmas: &'d [String],
    tfidf: &TfIdfTable,
) -> Option<(&'d str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for lemma in lemmas {
        let weight = tfidf.weight(doc, lemma);
        match best {
            Some((_, w)) if w >= weight => {}
            _ => best = Some((lemma, weight)),
        }
    }
    best
}

/// Scores `document` against the query and picks its best response line.
///
/// Both vectors live in lemma space: every query position and every prefix
/// token contributes the maximum TF-IDF weight over its lemma set, recorded
/// under that best lemma (the weight depends only on the lemma, so a key is
/// never written twice with different values). Similarity after line `k` is
/// `dot / (‖prefix‖·‖query‖)` over lines `0..=k`, with a zero norm treated
/// as similarity 0. The maximum is tracked with strict `>`, so the earliest
/// best prefix wins ties.
///
/// In answer mode the line *after* the best prefix is emitted instead,
/// unless the best prefix already ends at the last line.
///
/// Returns `None` for an empty document.
pub fn score_document(
    doc_id: DocId,
    document: &Document,
    query: &[QueryTerm],
    dictionary: &LemmaDictionary,
    tfidf: &TfIdfTable,
    choose_answer: bool,
) -> Option<ScoredQuote> {
    if document.lines.is_empty() {
        return None;
    }

    let mut query_vector: HashMap<&str, f64> = HashMap::new();
    for term in query {
        if let Some((lemma, weight)) = best_lemma(doc_id, &term.lemmas, tfidf) {
            query_vector.insert(lemma, weight);
        }
    }
    let query_norm_sq: f64 = query_vector.values().map(|w| w * w).sum();

    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut prefix: HashMap<String, f64> = HashMap::new();
    let mut dot = 0.0;
    let mut prefix_norm_sq = 0.0;
    let mut best_line = 0;
    let mut best_score = f64::NEG_INFINITY;

    for (k, line) in document.lines.iter().enumerate() {
        for token in tokenize(&line.text) {
            if !seen_tokens.insert(token.clone()) {
                continue;
            }
            let Some((lemma, weight)) = best_lemma(doc_id, dictionary.lookup(&token), tfidf)
            else {
                continue;
            };
            if prefix.contains_key(lemma) {
                continue;
            }
            prefix_norm_sq += weight * weight;
            if let Some(qw) = query_vector.get(lemma) {
                dot += weight * qw;
            }
            prefix.insert(lemma.to_string(), weight);
        }

        let denom_sq = prefix_norm_sq * query_norm_sq;
        let similarity = if denom_sq > 0.0 {
            (dot / denom_sq.sqrt()).clamp(0.0, 1.0)
        } else {
            0.0
        };
        if similarity > best_score {
            best_score = similarity;
            best_line = k;
        }
    }

    let line = if choose_answer && best_line + 1 < document.lines.len() {
        best_line + 1
    } else {
        best_line
    };

    Some(ScoredQuote {
        doc: doc_id,
        line,
        text: document.lines[line].raw.clone(),
        score: best_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::lemmatize_query;
    use dialogue_index::{Corpus, Granularity};
    use morphology::{NullProgress, StopwordSet};
    use std::io::Write;

    // Two documents so document frequencies differ and idf is non-zero.
    fn fixtures() -> (Corpus, LemmaDictionary, TfIdfTable) {
        let mut dict = tempfile::NamedTempFile::new().unwrap();
        let entries = "zamek;zamek;subst\nstoi;stoi;verb\nrzeka;rzeka;subst\n\
                       rzeka;rzeką;subst\nmost;most;subst\nmost;mostem;subst\n\
                       woda;woda;subst\nwoda;wodą;subst\n";
        dict.write_all(entries.as_bytes()).unwrap();
        let dictionary = LemmaDictionary::load(dict.path(), &mut NullProgress).unwrap();

        let mut corpus = tempfile::NamedTempFile::new().unwrap();
        corpus
            .write_all(
                "A: Most nad rzeką.\nB: Woda pod mostem.\nC: Zamek stoi nad wodą.\n\
                 \n\
                 A: Zamek stoi.\n"
                    .as_bytes(),
            )
            .unwrap();
        let corpus = Corpus::load(corpus.path(), Granularity::Dialogue).unwrap();
        let tfidf = TfIdfTable::build(&corpus, &dictionary, &mut NullProgress);

        (corpus, dictionary, tfidf)
    }

    fn query(text: &str, dictionary: &LemmaDictionary) -> Vec<QueryTerm> {
        lemmatize_query(text, dictionary, &StopwordSet::empty())
    }

    #[test]
    fn similarity_stays_within_unit_interval() {
        let (corpus, dictionary, tfidf) = fixtures();
        for text in ["rzeka", "zamek stoi", "most woda rzeka", "nieznane słowo"] {
            let terms = query(text, &dictionary);
            for (id, doc) in corpus.documents().iter().enumerate() {
                let scored =
                    score_document(id as DocId, doc, &terms, &dictionary, &tfidf, false).unwrap();
                assert!(
                    (0.0..=1.0).contains(&scored.score),
                    "score {} out of range",
                    scored.score
                );
            }
        }
    }

    #[test]
    fn zero_weight_query_scores_zero_on_line_zero() {
        let (corpus, dictionary, tfidf) = fixtures();
        let terms = query("nieznane", &dictionary);
        let scored =
            score_document(0, &corpus.documents()[0], &terms, &dictionary, &tfidf, false).unwrap();

        assert_eq!(scored.score, 0.0);
        assert_eq!(scored.line, 0);
    }

    #[test]
    fn inflected_corpus_forms_match_through_their_lemma() {
        let (corpus, dictionary, tfidf) = fixtures();
        // The corpus only contains "rzeką"; the query uses the base form.
        let terms = query("rzeka", &dictionary);
        let scored =
            score_document(0, &corpus.documents()[0], &terms, &dictionary, &tfidf, false).unwrap();

        assert!(scored.score > 0.0);
        assert_eq!(scored.line, 0);
    }

    #[test]
    fn growing_evidence_moves_the_cut_point_forward() {
        let (corpus, dictionary, tfidf) = fixtures();
        // "woda" only enters the prefix at line 1.
        let terms = query("woda", &dictionary);
        let scored =
            score_document(0, &corpus.documents()[0], &terms, &dictionary, &tfidf, false).unwrap();

        assert_eq!(scored.line, 1);
        assert_eq!(scored.text, "B: Woda pod mostem.");
        assert!(scored.score > 0.0);
    }

    #[test]
    fn earliest_prefix_wins_ties() {
        let (corpus, dictionary, tfidf) = fixtures();
        // "rzeką" matches in line 0; later lines only dilute the prefix or
        // repeat the same lemmas, so the similarity never strictly improves.
        let terms = query("rzeka", &dictionary);
        let scored =
            score_document(0, &corpus.documents()[0], &terms, &dictionary, &tfidf, false).unwrap();

        assert_eq!(scored.line, 0);
    }

    #[test]
    fn answer_mode_emits_the_following_line() {
        let (corpus, dictionary, tfidf) = fixtures();
        let terms = query("rzeka", &dictionary);
        let scored =
            score_document(0, &corpus.documents()[0], &terms, &dictionary, &tfidf, true).unwrap();

        assert_eq!(scored.line, 1);
        assert_eq!(scored.text, "B: Woda pod mostem.");
    }

    #[test]
    fn answer_mode_never_selects_past_the_last_line() {
        let (corpus, dictionary, tfidf) = fixtures();
        // Single-line document: the best prefix is the last line.
        let terms = query("zamek", &dictionary);
        let scored =
            score_document(1, &corpus.documents()[1], &terms, &dictionary, &tfidf, true).unwrap();

        assert_eq!(scored.line, 0);
        assert_eq!(scored.text, "A: Zamek stoi.");
    }

    #[test]
    fn empty_document_yields_none() {
        let (_, dictionary, tfidf) = fixtures();
        let empty = Document { lines: vec![] };
        assert!(score_document(0, &empty, &[], &dictionary, &tfidf, false).is_none());
    }
}
