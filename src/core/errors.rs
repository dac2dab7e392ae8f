//! Custom error types for Custom Translator operations

use thiserror::Error;

/// Coarse classification of a [`TrainerError`], for callers that need to branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The remote service answered with a non-success status
    HttpStatus,
    /// The request never produced a response
    Transport,
    /// Reading or writing a local file failed
    LocalIo,
    /// Anything else (bad config, malformed response, ...)
    Other,
}

/// Errors raised by the management client, the translator and the pipeline
#[derive(Error, Debug)]
pub enum TrainerError {
    /// API request failed with a non-success status. `message` is the raw response body.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Network error
    #[error("Network error: {message}")]
    NetworkError {
        /// Description of the failure
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponseError {
        /// Description of the failure
        message: String,
    },

    /// File operation error
    #[error("File error: {path} - {message}")]
    FileError {
        /// Path that was being read or written
        path: String,
        /// Underlying I/O error
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the failure
        message: String,
    },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field
        field: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl TrainerError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrainerError::ApiError { .. } => ErrorKind::HttpStatus,
            TrainerError::NetworkError { .. } => ErrorKind::Transport,
            TrainerError::HttpError(e) if e.status().is_some() => ErrorKind::HttpStatus,
            TrainerError::HttpError(_) => ErrorKind::Transport,
            TrainerError::FileError { .. } | TrainerError::IoError(_) => ErrorKind::LocalIo,
            _ => ErrorKind::Other,
        }
    }

    /// Raw response body of an HTTP-status failure
    pub fn response_body(&self) -> Option<&str> {
        match self {
            TrainerError::ApiError { message, .. } => Some(message),
            _ => None,
        }
    }

    /// HTTP status of an HTTP-status failure
    pub fn status(&self) -> Option<u16> {
        match self {
            TrainerError::ApiError { status, .. } => Some(*status),
            TrainerError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for Custom Translator operations
pub type Result<T> = std::result::Result<T, TrainerError>;
