//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A transaction touched a key it did not declare.
    #[error("undeclared state key: {0}")]
    UndeclaredKey(String),

    /// A value exceeded the chunk budget declared for its key.
    #[error("value for {key} needs {chunks} chunks, {max} declared")]
    ChunkLimitExceeded { key: String, chunks: usize, max: u16 },

    /// Invalid data in storage.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A lock guarding shared state was poisoned by a panicking writer.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
