use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] wort_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("German headword cannot be provided empty")]
    EmptyGerman,
    #[error("Word ID cannot be empty")]
    EmptyWordId,
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Word not found for id/prefix: {0}")]
    WordNotFound(String),
    #[error("{0}")]
    AmbiguousWordId(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Sync failed: {0}")]
    SyncFailed(String),
    #[error(
        "Sync is not configured. Run `wort config init --api-base-url <URL>` and `wort auth login` to enable sync."
    )]
    SyncNotConfigured,
}
