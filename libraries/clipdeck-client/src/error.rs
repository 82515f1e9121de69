//! Error types for the Clipdeck API client.

use crate::retry::Retryable;
use clipdeck_core::ClipError;
use thiserror::Error;

/// Errors that can occur when talking to the sound data provider.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The requested resource definitively does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// Rate limited by server
    #[error("Rate limited, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },
}

impl Retryable for ClientError {
    fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::NotFound(_) | ClientError::ServerError { status: 404 | 410, .. }
        )
    }
}

impl From<ClientError> for ClipError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::InvalidUrl(msg) => ClipError::config(msg),
            ClientError::ParseError(msg) => ClipError::Other(msg),
            other => ClipError::network(other.to_string()),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
