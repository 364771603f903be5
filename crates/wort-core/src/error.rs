//! Error types for wort-core

use thiserror::Error;

/// Result type alias using wort-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in wort-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Word not found
    #[error("Word not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Word API error
    #[error("API error: {0}")]
    Api(String),
}
