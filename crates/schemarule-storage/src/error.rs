//! Storage error types for schemarule-storage.
//!
//! [`StorageError`] covers backend failures only. An empty candidate set is
//! a normal result, not an error.

use schemarule_core::{HasStatus, Status, TokenKind};
use thiserror::Error;

/// Errors produced by catalog backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The SQLite driver reported a failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A stored row could not be decoded.
    #[error("corrupt row: {reason}")]
    CorruptRow { reason: String },

    /// The namespace has no ids left to allocate.
    #[error("{kind} token ids exhausted")]
    TokenIdsExhausted { kind: TokenKind },
}

impl HasStatus for StorageError {
    fn status(&self) -> Status {
        Status::StorageFailed
    }
}
