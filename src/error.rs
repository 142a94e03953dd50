//! Error types for Reelpage.

use thiserror::Error;

/// Library-level error type for Reelpage operations.
#[derive(Error, Debug)]
pub enum ReelpageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not find video ID for {0}")]
    MissingIdentity(String),

    #[error("Extraction failed: {0}")]
    Extraction(String),

    #[error("Completion request failed: {0}")]
    Completion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Reelpage operations.
pub type Result<T> = std::result::Result<T, ReelpageError>;
