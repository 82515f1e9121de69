//! Playback coordinator - wiring
//!
//! Owns the pieces every button shares (resolver, loader, slot, play
//! counter) and hands out [`SoundButton`]s bound to them.

use crate::button::SoundButton;
use crate::loader::Loader;
use crate::media::MediaBackend;
use crate::resolver::CandidateResolver;
use crate::slot::PlaybackSlot;
use clipdeck_core::{ClipConfig, PlayCounter, SoundRef};
use std::sync::Arc;
use std::time::Duration;

/// Default pressed-state duration after a trigger
pub const DEFAULT_PRESS_FEEDBACK: Duration = Duration::from_millis(150);

/// Shared services injected into every button
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) resolver: Arc<CandidateResolver>,
    pub(crate) loader: Arc<Loader>,
    pub(crate) slot: PlaybackSlot,
    pub(crate) counter: Option<Arc<dyn PlayCounter>>,
    pub(crate) press_feedback: Duration,
}

/// Entry point for sound button playback
///
/// # Example
///
/// ```rust,no_run
/// use clipdeck_core::{ClipConfig, SoundId, SoundRef};
/// use clipdeck_playback::{MediaBackend, PlaybackCoordinator};
/// use std::sync::Arc;
///
/// # async fn demo(backend: Arc<dyn MediaBackend>) {
/// let coordinator = PlaybackCoordinator::new(backend, &ClipConfig::default());
///
/// let sound = SoundRef::new(SoundId::new(1), "Air horn")
///     .with_relative_media_path("/sounds/airhorn.mp3");
/// let button = coordinator.button(sound);
///
/// button.trigger().await;
/// # }
/// ```
#[derive(Clone)]
pub struct PlaybackCoordinator {
    services: Services,
}

impl PlaybackCoordinator {
    /// Create a coordinator with its own empty playback slot
    pub fn new(backend: Arc<dyn MediaBackend>, config: &ClipConfig) -> Self {
        let loader = Loader::new(backend).with_ready_timeout(config.ready_timeout());
        Self::from_parts(
            CandidateResolver::from_config(config),
            loader,
            PlaybackSlot::new(),
        )
        .with_press_feedback(config.press_feedback())
    }

    /// Assemble from individually configured parts
    pub fn from_parts(resolver: CandidateResolver, loader: Loader, slot: PlaybackSlot) -> Self {
        Self {
            services: Services {
                resolver: Arc::new(resolver),
                loader: Arc::new(loader),
                slot,
                counter: None,
                press_feedback: DEFAULT_PRESS_FEEDBACK,
            },
        }
    }

    /// Notify `counter` whenever a button confirms a playback start
    #[must_use]
    pub fn with_play_counter(mut self, counter: Arc<dyn PlayCounter>) -> Self {
        self.services.counter = Some(counter);
        self
    }

    #[must_use]
    pub fn with_press_feedback(mut self, press_feedback: Duration) -> Self {
        self.services.press_feedback = press_feedback;
        self
    }

    /// Create a button for `sound`
    pub fn button(&self, sound: SoundRef) -> SoundButton {
        SoundButton::new(sound, self.services.clone())
    }

    pub fn slot(&self) -> &PlaybackSlot {
        &self.services.slot
    }

    pub fn resolver(&self) -> &CandidateResolver {
        &self.services.resolver
    }

    /// Stop whatever is playing
    pub fn stop_all(&self) {
        self.services.slot.pause();
    }
}
