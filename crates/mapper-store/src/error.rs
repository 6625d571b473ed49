//! Error types for the puzzle store.

use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the puzzle store and the editing rules it enforces.
#[derive(Debug, Error)]
pub enum Error {
    /// RocksDB could not open, read or write the data directory.
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored puzzle or piece document is not valid JSON for its type.
    #[error("corrupt document: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Unknown puzzle id, piece code or piece id.
    #[error("{0} not found")]
    NotFound(String),

    /// An edit broke a mapping rule, e.g. a duplicate piece code, a sector
    /// the puzzle does not have, or an edge id outside 1..=6.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The data directory could not be created.
    #[error("data directory: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
