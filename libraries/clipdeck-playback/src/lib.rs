//! Clipdeck - Sound Button Playback
//!
//! Platform-agnostic playback coordination for pages full of sound buttons.
//!
//! This crate provides:
//! - Candidate source resolution (direct API, object storage, media path)
//! - Bounded-latency loading with readiness/timeout races
//! - A single global playback slot (at most one sound plays at a time)
//! - Per-button controllers with latest-wins request sequencing
//!
//! # Architecture
//!
//! `clipdeck-playback` never decodes audio and never talks HTTP:
//! - Media elements come from a platform [`MediaBackend`]
//! - Play counting goes through [`clipdeck_core::PlayCounter`]
//!
//! ```text
//! SoundButton::trigger
//!   -> PlaybackSlot::pause          (silence first)
//!   -> CandidateResolver::resolve   (ordered URLs)
//!   -> Loader::load                 (first ready candidate, cancellable)
//!   -> PlaybackSlot::register       (stop old, start new)
//! ```
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use clipdeck_playback::{MediaBackend, MediaElement, MediaEvent, ReadyState, Result};
//! use std::sync::Arc;
//! use tokio::sync::broadcast;
//!
//! struct BridgeElement {
//!     url: String,
//!     events: broadcast::Sender<MediaEvent>,
//! }
//!
//! impl MediaElement for BridgeElement {
//!     fn url(&self) -> &str { &self.url }
//!     fn begin_load(&self) { /* ask the platform to fetch */ }
//!     fn play(&self) -> Result<()> { Ok(()) }
//!     fn pause(&self) {}
//!     fn seek_to_start(&self) {}
//!     fn clear_source(&self) {}
//!     fn has_source(&self) -> bool { true }
//!     fn is_playing(&self) -> bool { false }
//!     fn ready_state(&self) -> ReadyState { ReadyState::HaveNothing }
//!     fn subscribe(&self) -> broadcast::Receiver<MediaEvent> { self.events.subscribe() }
//! }
//!
//! struct Bridge;
//!
//! impl MediaBackend for Bridge {
//!     fn create(&self, url: &str) -> Result<Arc<dyn MediaElement>> {
//!         let (events, _) = broadcast::channel(16);
//!         Ok(Arc::new(BridgeElement { url: url.to_string(), events }))
//!     }
//! }
//! ```

mod button;
mod coordinator;
mod error;
mod events;
mod handle;
mod loader;
mod media;
mod request;
mod resolver;
mod slot;
pub mod types;

// Public exports
pub use button::SoundButton;
pub use coordinator::{PlaybackCoordinator, DEFAULT_PRESS_FEEDBACK};
pub use error::{PlaybackError, Result};
pub use events::{SlotEvent, StopReason};
pub use handle::{AudioHandle, HandleId};
pub use loader::{Loader, DEFAULT_READY_TIMEOUT};
pub use media::{MediaBackend, MediaElement, MediaEvent, ReadyState};
pub use request::{RequestId, RequestSequencer, RequestTicket};
pub use resolver::CandidateResolver;
pub use slot::PlaybackSlot;
pub use types::{ButtonState, TriggerOutcome};
