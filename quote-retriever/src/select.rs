//! Selection policies: pick one response from the scored candidates.
//!
//! Two mutually exclusive modes. Randomized treats similarity scores as
//! draw weights and samples without replacement until an unused response
//! turns up; best-match is fully deterministic. Both record whatever text
//! they return into the session before returning it.

use rand::Rng;
use tracing::debug;

use crate::scorer::ScoredQuote;
use crate::session::ChatSession;

/// How one response is picked from the scored candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Weighted random draw without repeats, default response when the
    /// pool runs dry.
    Randomized,
    /// Highest score wins; already-used responses are skipped by a linear
    /// scan, wrapping to the first candidate as a last resort.
    BestMatch,
}

impl SelectionMode {
    /// Parses a configuration value (`randomized` | `best`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "randomized" | "random" => Some(SelectionMode::Randomized),
            "best" | "best-match" | "bestmatch" => Some(SelectionMode::BestMatch),
            _ => None,
        }
    }
}

/// Picks one response and records it into the session.
pub fn select<R: Rng>(
    mode: SelectionMode,
    quotes: &[ScoredQuote],
    session: &mut ChatSession,
    default_response: &str,
    rng: &mut R,
) -> String {
    let text = match mode {
        SelectionMode::Randomized => pick_randomized(quotes, session, default_response, rng),
        SelectionMode::BestMatch => pick_best(quotes, session, default_response),
    };
    session.record(text.clone());
    text
}

/// Draws candidates by weight, without replacement, until one is unused.
///
/// The pool shrinks by the drawn candidate on every round; an exhausted
/// pool yields the default response.
fn pick_randomized<R: Rng>(
    quotes: &[ScoredQuote],
    session: &ChatSession,
    default_response: &str,
    rng: &mut R,
) -> String {
    let mut pool: Vec<&ScoredQuote> = quotes.iter().collect();
    while !pool.is_empty() {
        let idx = weighted_index(&pool, rng);
        let drawn = pool.swap_remove(idx);
        if !session.is_used(&drawn.text) {
            return drawn.text.clone();
        }
    }
    debug!("randomized pool exhausted, falling back to the default response");
    default_response.to_string()
}

/// Cumulative-weight draw against a uniform value in `[0, total)`.
///
/// A pool whose weights sum to zero degrades to a uniform index draw.
fn weighted_index<R: Rng>(pool: &[&ScoredQuote], rng: &mut R) -> usize {
    let total: f64 = pool.iter().map(|q| q.score).sum();
    if total <= 0.0 {
        return rng.gen_range(0..pool.len());
    }
    let r = rng.gen_range(0.0..total);
    let mut upto = 0.0;
    for (i, quote) in pool.iter().enumerate() {
        upto += quote.score;
        if upto >= r {
            return i;
        }
    }
    pool.len() - 1
}

/// Deterministic best-score selection with used-response fallback.
///
/// The first maximum in candidate order wins. If its text was already
/// used, the candidate list is scanned in its original order for the first
/// unused response; when every response is used, the scan wraps to the
/// first candidate and repetition is accepted.
fn pick_best(quotes: &[ScoredQuote], session: &ChatSession, default_response: &str) -> String {
    let Some(best) = quotes.iter().reduce(|a, b| if b.score > a.score { b } else { a }) else {
        return default_response.to_string();
    };
    if !session.is_used(&best.text) {
        return best.text.clone();
    }
    if let Some(unused) = quotes.iter().find(|q| !session.is_used(&q.text)) {
        return unused.text.clone();
    }
    debug!("every candidate already used, repeating the first one");
    quotes[0].text.clone()
}
