//! Surface form → base form(s) dictionary.
//!
//! The source is a flat text file with one `base;surface;tags` entry per
//! line (the polimorfologik format). One surface form may map to several
//! base forms; all of them are plausible lemmas and the parse order is
//! preserved. No part-of-speech disambiguation happens here or anywhere
//! downstream.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::errors::{MorphologyError, Result};
use crate::progress::Progress;

/// How many source lines pass between two progress notifications.
const PROGRESS_STRIDE: u64 = 1000;

/// Immutable lookup table from lower-cased surface forms to base forms.
#[derive(Debug, Default)]
pub struct LemmaDictionary {
    entries: HashMap<String, Vec<String>>,
}

impl LemmaDictionary {
    /// Loads the dictionary from a `base;surface;tags` flat file.
    ///
    /// Surface forms are lower-cased at load time, so lookups are
    /// case-insensitive. Blank lines are skipped; any other line that does
    /// not have exactly three `;`-separated fields is an error.
    ///
    /// # Errors
    /// - [`MorphologyError::Io`] if the file cannot be opened or read.
    /// - [`MorphologyError::MalformedEntry`] on the first malformed line.
    pub fn load(path: impl AsRef<Path>, progress: &mut dyn Progress) -> Result<Self> {
        let path = path.as_ref();
        info!("loading lemma dictionary from {}", path.display());

        let reader = BufReader::new(File::open(path)?);
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();

        progress.begin("lemma dictionary", None);
        let mut pending: u64 = 0;
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            pending += 1;
            if pending == PROGRESS_STRIDE {
                progress.advance(pending);
                pending = 0;
            }
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(';').collect();
            let [base, surface, _tags] = fields.as_slice() else {
                return Err(MorphologyError::MalformedEntry { line: line_no + 1 });
            };

            entries
                .entry(surface.to_lowercase())
                .or_default()
                .push(base.to_string());
        }
        progress.advance(pending);
        progress.finish();

        debug!("lemma dictionary holds {} surface forms", entries.len());
        Ok(Self { entries })
    }

    /// Base forms for `surface`, in dictionary order; empty if unknown.
    ///
    /// Matching is case-insensitive.
    pub fn lookup(&self, surface: &str) -> &[String] {
        self.entries
            .get(&surface.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct surface forms.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
