//! Domain-level error types for cubox-export.
//!
//! All errors are typed with `thiserror`. `AppError` covers failures that stop
//! a command; `ItemError` covers failures scoped to a single inbox item, which
//! are logged and counted but never abort a run.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Transport-level HTTP failure (connection, TLS, body read).
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The Cubox API answered with a non-success `code`.
    #[error("Cubox API returned code {code}: {message}")]
    Api { code: i64, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {message}")]
    JsonParse {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create an HTTP error from a reqwest error.
    pub fn http(err: reqwest::Error) -> Self {
        Self::Http {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a JSON parse error.
    pub fn json_parse(err: serde_json::Error) -> Self {
        Self::JsonParse {
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Failure while exporting a single inbox item.
#[derive(Error, Debug)]
pub enum ItemError {
    /// The export request failed or returned a non-success HTTP status.
    #[error("export request for {id} failed: {source}")]
    Request {
        id: String,
        #[source]
        source: reqwest::Error,
    },

    /// The exported content could not be written to disk.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
