//! Error type shared by the memory store.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Nothing to store: content is empty")]
    EmptyContent,

    #[error("Memory #{0} not found")]
    NotFound(u64),

    #[error("Decryption failed - wrong password or corrupted secret")]
    DecryptionFailed,

    #[error("Unrecognized date: '{0}' (use today, yesterday, YYYY-MM-DD or DD.MM.YYYY)")]
    InvalidDateTerm(String),

    #[error("Malformed secret: {0}")]
    MalformedVaultBlob(String),

    #[error("Invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Store inconsistency: {0}")]
    Invariant(String),

    #[error("Storage error at {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MemoryError {
    pub(crate) fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MemoryError::Persistence {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MemoryError>;
