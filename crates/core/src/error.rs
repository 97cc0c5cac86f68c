//! Error types for drivelink-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for drivelink-core
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for drivelink-core
#[derive(Error, Debug)]
pub enum Error {
    /// A request returned a non-success status
    #[error("HTTP {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    /// A success response lacked a contractually required field
    #[error("Invalid response: {0}")]
    Validation(String),

    /// A chunk submission inside a resumable session returned an unexpected status
    #[error("Chunk upload failed at offset {offset}: HTTP {status}: {body}")]
    Protocol {
        offset: u64,
        status: u16,
        body: String,
    },

    /// The chunk loop sent the full payload without ever receiving a
    /// completion response
    #[error("Upload session exhausted without completion ({total} bytes sent)")]
    SessionExhausted { total: u64 },

    /// Token provider failed to produce a bearer token
    #[error("Token acquisition failed: {0}")]
    Token(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidConfig(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] toml::de::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Timeout
    #[error("Operation timed out")]
    Timeout,
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_connect() {
            Error::Network(err.to_string())
        } else if err.is_request() {
            Error::HttpClient(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}
