//! Core traits for Clipdeck
use async_trait::async_trait;

use crate::error::Result;
use crate::types::SoundId;

/// Play/view counter collaborator
///
/// Notified once a sound has audibly started. Callers treat the outcome as
/// unobservable: failures are logged and discarded, never surfaced to the
/// user and never allowed to block playback.
#[async_trait]
pub trait PlayCounter: Send + Sync {
    /// Record one confirmed playback start for `sound_id`
    ///
    /// # Errors
    /// Returns an error if the counter endpoint could not be reached
    async fn record_play(&self, sound_id: SoundId) -> Result<()>;
}
