//! Disk snapshots for the one-time build products.
//!
//! A snapshot is a JSON envelope `{version, signature, payload}`. The
//! signature ties the payload to the exact corpus bytes, corpus path and
//! granularity it was built from; loading with a different signature fails
//! with [`IndexError::StaleSnapshot`] and the caller rebuilds. Writes go
//! through a temp file in the target directory and are persisted atomically,
//! so a crashed run never leaves a half-written snapshot behind.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::errors::{IndexError, Result};

/// Bumped whenever the snapshot payload layout changes.
pub const SCHEMA_VERSION: u32 = 1;

/// Freshness signature a snapshot is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    corpus_path: String,
    corpus_sha256: String,
    granularity: String,
}

impl Signature {
    /// Computes the signature of a corpus file at the given granularity.
    ///
    /// # Errors
    /// Returns [`IndexError::Io`] if the corpus cannot be read.
    pub fn of_file(corpus_path: impl AsRef<Path>, granularity_tag: &str) -> Result<Self> {
        let corpus_path = corpus_path.as_ref();
        let bytes = std::fs::read(corpus_path)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(Self {
            corpus_path: corpus_path.to_string_lossy().into_owned(),
            corpus_sha256: format!("{:x}", hasher.finalize()),
            granularity: granularity_tag.to_string(),
        })
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    signature: Signature,
    payload: T,
}

fn snapshot_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.json"))
}

/// Whether a snapshot file exists under `name` (regardless of freshness).
pub fn exists(dir: impl AsRef<Path>, name: &str) -> bool {
    snapshot_path(dir.as_ref(), name).is_file()
}

/// Writes `value` as the snapshot `name`, replacing any previous one.
///
/// # Errors
/// - [`IndexError::Io`] on directory or temp-file errors.
/// - [`IndexError::Parse`] if the value cannot be serialized.
/// - [`IndexError::Persist`] if the atomic replace fails.
pub fn store<T: Serialize>(
    dir: impl AsRef<Path>,
    name: &str,
    signature: &Signature,
    value: &T,
) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    let path = snapshot_path(dir, name);

    let envelope = Envelope {
        version: SCHEMA_VERSION,
        signature: signature.clone(),
        payload: value,
    };

    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, &envelope)?;
        writer.flush()?;
    }
    tmp.persist(&path)
        .map_err(|e| IndexError::Persist(e.to_string()))?;

    info!("stored snapshot {}", path.display());
    Ok(path)
}

/// Loads the snapshot `name` and validates it against `signature`.
///
/// # Errors
/// - [`IndexError::SnapshotMissing`] if no snapshot exists.
/// - [`IndexError::Parse`] if the file is not a valid envelope.
/// - [`IndexError::VersionMismatch`] on a schema version mismatch.
/// - [`IndexError::StaleSnapshot`] if the stored signature differs.
pub fn load<T: DeserializeOwned>(dir: &Path, name: &str, signature: &Signature) -> Result<T> {
    let path = snapshot_path(dir, name);
    if !path.is_file() {
        return Err(IndexError::SnapshotMissing { path });
    }

    let reader = BufReader::new(File::open(&path)?);
    let envelope: Envelope<T> = serde_json::from_reader(reader)?;

    if envelope.version != SCHEMA_VERSION {
        return Err(IndexError::VersionMismatch {
            got: envelope.version,
            want: SCHEMA_VERSION,
        });
    }
    if envelope.signature != *signature {
        return Err(IndexError::StaleSnapshot { path });
    }

    debug!("loaded snapshot {}", path.display());
    Ok(envelope.payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::Write as _;

    fn corpus_file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn roundtrips_under_matching_signature() {
        let corpus = corpus_file("A: raz\n");
        let dir = tempfile::tempdir().unwrap();
        let sig = Signature::of_file(corpus.path(), "dialogue").unwrap();

        let value: BTreeMap<String, u32> = [("pić".to_string(), 2)].into();
        store(dir.path(), "test", &sig, &value).unwrap();

        assert!(exists(dir.path(), "test"));
        let restored: BTreeMap<String, u32> = load(dir.path(), "test", &sig).unwrap();
        assert_eq!(restored, value);
    }

    #[test]
    fn missing_snapshot_is_reported() {
        let corpus = corpus_file("A: raz\n");
        let dir = tempfile::tempdir().unwrap();
        let sig = Signature::of_file(corpus.path(), "dialogue").unwrap();

        let err = load::<u32>(dir.path(), "absent", &sig).unwrap_err();
        assert!(matches!(err, IndexError::SnapshotMissing { .. }));
    }

    #[test]
    fn changed_corpus_content_makes_the_snapshot_stale() {
        let corpus = corpus_file("A: raz\n");
        let dir = tempfile::tempdir().unwrap();
        let sig = Signature::of_file(corpus.path(), "dialogue").unwrap();
        store(dir.path(), "test", &sig, &1u32).unwrap();

        let changed = corpus_file("A: raz\nB: dwa\n");
        let new_sig = Signature::of_file(changed.path(), "dialogue").unwrap();
        let err = load::<u32>(dir.path(), "test", &new_sig).unwrap_err();
        assert!(matches!(err, IndexError::StaleSnapshot { .. }));
    }

    #[test]
    fn granularity_is_part_of_the_signature() {
        let corpus = corpus_file("A: raz\n");
        let a = Signature::of_file(corpus.path(), "dialogue").unwrap();
        let b = Signature::of_file(corpus.path(), "line").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_snapshot_fails_to_parse() {
        let corpus = corpus_file("A: raz\n");
        let dir = tempfile::tempdir().unwrap();
        let sig = Signature::of_file(corpus.path(), "dialogue").unwrap();

        std::fs::write(snapshot_path(dir.path(), "test"), b"not json at all").unwrap();
        let err = load::<u32>(dir.path(), "test", &sig).unwrap_err();
        assert!(matches!(err, IndexError::Parse(_)));
    }

    #[test]
    fn old_schema_version_is_rejected() {
        let corpus = corpus_file("A: raz\n");
        let dir = tempfile::tempdir().unwrap();
        let sig = Signature::of_file(corpus.path(), "dialogue").unwrap();

        let envelope = serde_json::json!({
            "version": 0,
            "signature": sig,
            "payload": 1,
        });
        std::fs::write(
            snapshot_path(dir.path(), "test"),
            serde_json::to_vec(&envelope).unwrap(),
        )
        .unwrap();

        let err = load::<u32>(dir.path(), "test", &sig).unwrap_err();
        assert!(matches!(err, IndexError::VersionMismatch { got: 0, want: 1 }));
    }
}
