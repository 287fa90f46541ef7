//! Error types for the finance tracker

use thiserror::Error;

/// Result type for tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Tracker errors
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error (RocksDB)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Persisted collection blob exists but cannot be parsed. Fatal at
    /// load time, never silently replaced with an empty collection.
    #[error("Malformed collection blob '{key}': {source}")]
    CorruptBlob {
        /// Key of the unreadable blob
        key: String,
        /// Underlying parse error
        source: serde_json::Error,
    },

    /// Referential integrity: a transaction mutation targeted an account
    /// that does not exist
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(err: rocksdb::Error) -> Self {
        Error::Storage(err.to_string())
    }
}
