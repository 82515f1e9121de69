//! Core error types for Clipdeck
use thiserror::Error;

use crate::types::SoundId;

/// Result type alias using `ClipError`
pub type Result<T> = std::result::Result<T, ClipError>;

/// Core error type for Clipdeck
#[derive(Error, Debug)]
pub enum ClipError {
    /// Sound does not exist on the data provider
    #[error("Sound not found: {0}")]
    SoundNotFound(SoundId),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Network error talking to an external collaborator
    #[error("Network error: {0}")]
    Network(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ClipError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<config::ConfigError> for ClipError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
