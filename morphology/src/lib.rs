//! Morphosyntactic building blocks for the retrieval pipeline.
//!
//! This crate provides:
//! - [`LemmaDictionary`] → surface form to base form(s) lookup
//! - [`tokenize`] / [`StopwordSet`] → word extraction and stopword filtering
//! - [`Progress`] → observer interface for one-time construction work
//!
//! Everything here is built once at startup and read-only afterwards.

mod dict;
pub mod errors;
pub mod progress;
mod tokenize;

pub use dict::LemmaDictionary;
pub use errors::{MorphologyError, Result};
pub use progress::{BarProgress, NullProgress, Progress};
pub use tokenize::{StopwordSet, tokenize};
