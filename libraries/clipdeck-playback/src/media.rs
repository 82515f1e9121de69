//! Platform-agnostic media element abstraction
//!
//! The coordinator never decodes audio itself. A platform (browser bridge,
//! desktop output, test double) supplies a [`MediaBackend`] that creates
//! [`MediaElement`]s bound to a single URL.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Media readiness, ordered from nothing to enough data for playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReadyState {
    /// No information about the resource
    HaveNothing = 0,
    /// Duration and dimensions are known
    HaveMetadata = 1,
    /// Data for the current position is available
    HaveCurrentData = 2,
    /// Data beyond the current position is available
    HaveFutureData = 3,
    /// Enough data to play through without stalling
    HaveEnoughData = 4,
}

impl ReadyState {
    /// Whether any readiness at all has been reached
    pub fn is_nonzero(self) -> bool {
        self > ReadyState::HaveNothing
    }
}

/// Events reported by a media element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaEvent {
    /// Fetching has begun
    LoadStart,
    /// Metadata is available
    LoadedMetadata,
    /// First frame of data is available
    LoadedData,
    /// Playback could start now
    CanPlay,
    /// Playback started
    Playing,
    /// Playback paused
    Paused,
    /// Playback reached the end naturally
    Ended,
    /// Hard media error
    Error(String),
}

impl MediaEvent {
    /// Whether this event signals "good enough to try"
    pub fn is_readiness(&self) -> bool {
        matches!(
            self,
            MediaEvent::LoadStart
                | MediaEvent::LoadedMetadata
                | MediaEvent::LoadedData
                | MediaEvent::CanPlay
        )
    }
}

/// A playable resource bound to exactly one URL
///
/// Implementors must deliver every event through the channel returned by
/// [`MediaElement::subscribe`]; subscribers created before
/// [`MediaElement::begin_load`] observe all loading events.
pub trait MediaElement: Send + Sync {
    /// URL this element was created for
    fn url(&self) -> &str;

    /// Start fetching the resource
    fn begin_load(&self);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback requested
    /// * `Err(_)` - The platform refused to play
    fn play(&self) -> Result<()>;

    /// Pause playback, keeping the position
    fn pause(&self);

    /// Rewind to the beginning
    fn seek_to_start(&self);

    /// Detach the source, releasing network and decoder resources
    fn clear_source(&self);

    /// Whether a source is still attached
    fn has_source(&self) -> bool;

    /// Whether the element is currently playing
    fn is_playing(&self) -> bool;

    /// Current readiness
    fn ready_state(&self) -> ReadyState;

    /// Subscribe to element events
    fn subscribe(&self) -> broadcast::Receiver<MediaEvent>;
}

/// Factory for media elements
pub trait MediaBackend: Send + Sync {
    /// Create an element bound to `url`; loading does not start yet
    fn create(&self, url: &str) -> Result<Arc<dyn MediaElement>>;
}

/// Stop the element and release its source
pub(crate) fn discard(element: &dyn MediaElement) {
    element.pause();
    element.clear_source();
}
