//! Error types for netdedupe.

use thiserror::Error;

/// Error type for netdedupe operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed CIDR, IP address or domain text
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// Unknown deduplication strategy name
    #[error("unknown dedupe strategy: {0}")]
    UnknownStrategy(String),

    /// Unknown list input format
    #[error("unknown input format: {0}")]
    UnknownInputFormat(String),

    /// Unknown list output format
    #[error("unknown output format: {0}")]
    UnknownOutputFormat(String),

    /// Unknown source compression
    #[error("unknown compression type: {0}")]
    UnknownCompression(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Download error
    #[error("download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    /// git invocation failed
    #[error("git error: {0}")]
    Git(String),
}

impl Error {
    pub(crate) fn invalid(input: &str) -> Self {
        Error::InvalidFormat(input.to_string())
    }
}

/// Result type alias for netdedupe operations.
pub type Result<T> = std::result::Result<T, Error>;
