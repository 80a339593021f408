//! Word tokenization and stopword filtering.
//!
//! Tokenization is deliberately simple: maximal runs of Unicode word
//! characters, lower-cased. Punctuation never becomes a token, so only word
//! tokens ever reach the dictionary. Repeated calls on the same line always
//! produce the same sequence.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::Result;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// Splits `text` into lower-cased word tokens, in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD.find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// A set of words excluded from query matching.
///
/// The on-disk form is a single comma-separated line (`a, aby, ale, ...`);
/// surrounding whitespace and newlines are tolerated.
#[derive(Debug, Default, Clone)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    /// An empty set: nothing is filtered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads a comma-separated stopword file.
    ///
    /// # Errors
    /// Returns [`MorphologyError::Io`](crate::MorphologyError::Io) if the file
    /// cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_words(text.split(',')))
    }

    /// Builds a set from an iterator of words; entries are trimmed and
    /// lower-cased, empty entries are dropped.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_and_drops_punctuation() {
        assert_eq!(tokenize("lorem, ipsum"), vec!["lorem", "ipsum"]);
        assert_eq!(tokenize("Ona piła wino."), vec!["ona", "piła", "wino"]);
        assert_eq!(tokenize("...!?"), Vec::<String>::new());
    }

    #[test]
    fn keeps_digits_and_is_stable() {
        assert_eq!(tokenize("rok 1984"), vec!["rok", "1984"]);
        assert_eq!(tokenize("Zażółć gęślą"), tokenize("Zażółć gęślą"));
    }

    #[test]
    fn stopwords_parse_comma_separated_line() {
        let set = StopwordSet::from_words("a, aby, ale\n".split(','));
        assert_eq!(set.len(), 3);
        assert!(set.contains("aby"));
        assert!(!set.contains("wino"));
    }

    #[test]
    fn empty_set_filters_nothing() {
        assert!(!StopwordSet::empty().contains("a"));
    }
}
