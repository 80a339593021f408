use thiserror::Error;

#[derive(Debug, Error)]
pub enum MorphologyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed dictionary entry at line {line}: expected `base;surface;tags`")]
    MalformedEntry { line: usize },
}

pub type Result<T> = std::result::Result<T, MorphologyError>;
