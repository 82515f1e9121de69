//! Error types for playback coordination

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The sound has no constructible candidate source
    #[error("No playable source")]
    NoCandidates,

    /// One candidate failed to become ready
    #[error("Candidate {url} failed: {reason}")]
    CandidateFailed { url: String, reason: String },

    /// Every candidate failed and none had partial readiness
    #[error("All {attempted} candidates failed (last error: {last_error})")]
    AllCandidatesFailed { attempted: usize, last_error: String },

    /// A newer request replaced this one
    #[error("Request superseded")]
    Superseded,

    /// Media element error (creation, play)
    #[error("Media error: {0}")]
    Media(String),
}

impl PlaybackError {
    /// Create a media error
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Whether this error only means a newer request took over
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
