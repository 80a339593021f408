//! Corpus model and flat-file parser.
//!
//! The corpus is a text file of dialogue lines. Parsing conventions:
//! - lines starting with `#` are comments and are skipped,
//! - a blank line ends the current dialogue,
//! - an optional speaker label (`Name: text`) is stripped for tokenization
//!   but preserved in the raw form used for display.
//!
//! Retrieval granularity is configurable: the unit of retrieval (a
//! "document") is either a whole multi-line dialogue or a single line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::errors::Result;

/// Identifier of a document: dense, 0-based, contiguous with corpus order.
pub type DocId = u32;

/// Unit of retrieval the corpus is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    /// Each multi-line dialogue is one document.
    Dialogue,
    /// Each line is its own single-line document.
    Line,
}

impl Granularity {
    /// Stable tag used in snapshot names and freshness signatures.
    pub fn tag(self) -> &'static str {
        match self {
            Granularity::Dialogue => "dialogue",
            Granularity::Line => "line",
        }
    }

    /// Parses a configuration value (`dialogue` | `line`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dialogue" => Some(Granularity::Dialogue),
            "line" => Some(Granularity::Line),
            _ => None,
        }
    }
}

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The line as it appeared in the corpus, speaker label included.
    pub raw: String,
    /// The spoken text with the speaker label stripped.
    pub text: String,
}

impl Line {
    fn parse(raw: &str) -> Self {
        // The speaker label ends at the last `:`, matching corpora where the
        // label itself may contain colons.
        let text = raw.rsplit_once(':').map(|(_, t)| t).unwrap_or(raw);
        Self {
            raw: raw.to_string(),
            text: text.trim().to_string(),
        }
    }
}

/// An ordered sequence of lines forming one unit of retrieval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<Line>,
}

/// The full corpus, documents aligned 1:1 with [`DocId`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Loads and splits a corpus file at the given granularity.
    ///
    /// # Errors
    /// Returns [`IndexError::Io`](crate::IndexError::Io) if the file cannot
    /// be read.
    pub fn load(path: impl AsRef<Path>, granularity: Granularity) -> Result<Self> {
        let path = path.as_ref();
        info!(
            "loading corpus from {} ({} granularity)",
            path.display(),
            granularity.tag()
        );

        let reader = BufReader::new(File::open(path)?);
        let mut documents = Vec::new();
        let mut current: Vec<Line> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim_end();
            if trimmed.starts_with('#') {
                continue;
            }
            if trimmed.trim().is_empty() {
                if !current.is_empty() {
                    documents.push(Document {
                        lines: std::mem::take(&mut current),
                    });
                }
                continue;
            }

            let parsed = Line::parse(trimmed);
            match granularity {
                Granularity::Dialogue => current.push(parsed),
                Granularity::Line => documents.push(Document {
                    lines: vec![parsed],
                }),
            }
        }
        if !current.is_empty() {
            documents.push(Document { lines: current });
        }

        debug!("corpus holds {} documents", documents.len());
        Ok(Self { documents })
    }

    /// Wraps pre-built documents; ids follow the slice order.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(id as usize)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "# drama quotes\n\
        HAMLET: Być albo nie być.\n\
        OFELIA: Oto jest pytanie.\n\
        \n\
        Bez etykiety mówcy.\n";

    fn corpus_file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn dialogue_granularity_groups_lines_between_blanks() {
        let f = corpus_file(SAMPLE);
        let corpus = Corpus::load(f.path(), Granularity::Dialogue).unwrap();

        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.documents()[0].lines.len(), 2);
        assert_eq!(corpus.documents()[1].lines.len(), 1);
    }

    #[test]
    fn line_granularity_splits_every_line() {
        let f = corpus_file(SAMPLE);
        let corpus = Corpus::load(f.path(), Granularity::Line).unwrap();

        assert_eq!(corpus.len(), 3);
        assert!(corpus.documents().iter().all(|d| d.lines.len() == 1));
    }

    #[test]
    fn speaker_label_is_stripped_for_text_and_kept_in_raw() {
        let f = corpus_file(SAMPLE);
        let corpus = Corpus::load(f.path(), Granularity::Dialogue).unwrap();

        let line = &corpus.documents()[0].lines[0];
        assert_eq!(line.raw, "HAMLET: Być albo nie być.");
        assert_eq!(line.text, "Być albo nie być.");

        let unlabeled = &corpus.documents()[1].lines[0];
        assert_eq!(unlabeled.text, "Bez etykiety mówcy.");
    }

    #[test]
    fn comment_lines_are_skipped() {
        let f = corpus_file("# tylko komentarz\n");
        let corpus = Corpus::load(f.path(), Granularity::Dialogue).unwrap();
        assert!(corpus.is_empty());
    }

    #[test]
    fn trailing_dialogue_without_blank_line_is_closed() {
        let f = corpus_file("A: raz\nB: dwa");
        let corpus = Corpus::load(f.path(), Granularity::Dialogue).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.documents()[0].lines.len(), 2);
    }
}
