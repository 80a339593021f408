//! Unified error types for the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for corpus, index and snapshot operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing / serialization errors.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// No snapshot exists under the requested name.
    #[error("snapshot not found: {}", path.display())]
    SnapshotMissing { path: PathBuf },

    /// Snapshot was written by an incompatible schema.
    #[error("snapshot version mismatch: got {got}, want {want}")]
    VersionMismatch { got: u32, want: u32 },

    /// Snapshot does not match the current corpus signature.
    #[error("stale snapshot: {}", path.display())]
    StaleSnapshot { path: PathBuf },

    /// Atomic replace of a snapshot file failed.
    #[error("snapshot persist error: {0}")]
    Persist(String),
}

pub type Result<T> = std::result::Result<T, IndexError>;
