//! Error types raised by repository implementations.

use thiserror::Error;

use super::DocumentKey;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("document store lock was poisoned")]
    LockPoisoned,

    #[error("failed to encode document {key}: {message}")]
    Encode { key: DocumentKey, message: String },

    #[error("document {key} is corrupted: {message}")]
    CorruptedDocument { key: DocumentKey, message: String },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
