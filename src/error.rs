//! MemeVault error types

use thiserror::Error;

/// MemeVault error type
#[derive(Error, Debug)]
pub enum Error {
    /// A query, alias, or digest did not resolve to a stored entry
    #[error("not found: {0}")]
    NotFound(String),

    /// An image could not be ingested (no usable source, failed fetch, ...)
    #[error("ingest failed: {0}")]
    Ingest(String),

    /// A durable file (index, alias table, blob) could not be written
    #[error("failed to persist {file}: {source}")]
    PersistenceWrite {
        file: String,
        #[source]
        source: std::io::Error,
    },

    /// Channel error
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for MemeVault operations
pub type Result<T> = std::result::Result<T, Error>;
