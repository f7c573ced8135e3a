//! Error types for quotebook-core

use thiserror::Error;

/// Result type alias using quotebook-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotebook-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or empty required field on a user-facing mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisting state failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed import file or stored blob
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
