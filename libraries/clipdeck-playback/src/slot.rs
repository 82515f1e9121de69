//! Global playback slot
//!
//! Holds at most one [`AudioHandle`]: the one currently playing. Every
//! mutation goes through the slot's own methods, which complete the
//! stop-old/start-new sequence while holding the slot lock, so two handles
//! are never playing at the same time.
//!
//! The slot is an explicitly constructed service. Clones share the same
//! state; construct one per application and hand clones to every button.

use crate::error::Result;
use crate::events::{SlotEvent, StopReason};
use crate::handle::AudioHandle;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

const EVENT_CHANNEL_CAPACITY: usize = 64;

struct SlotInner {
    current: Mutex<Option<AudioHandle>>,
    events: broadcast::Sender<SlotEvent>,
}

/// Single "currently playing" slot shared by all buttons
#[derive(Clone)]
pub struct PlaybackSlot {
    inner: Arc<SlotInner>,
}

impl Default for PlaybackSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(SlotInner {
                current: Mutex::new(None),
                events,
            }),
        }
    }

    /// Make `handle` the occupant and start it.
    ///
    /// A different occupant is stopped and rewound first. Registering the
    /// handle that already occupies the slot is a no-op while it plays, and
    /// resumes it otherwise.
    ///
    /// # Errors
    /// Returns the element's error if it refuses to play; the slot is then empty.
    pub fn register(&self, handle: &AudioHandle) -> Result<()> {
        let mut current = self.lock();

        match current.as_ref() {
            Some(existing) if existing == handle => {
                if handle.is_playing() {
                    return Ok(());
                }
            }
            Some(existing) => {
                existing.stop();
                debug!(handle = %existing.id(), "Stopped previous occupant");
                self.emit(SlotEvent::Stopped {
                    handle: existing.id(),
                    reason: StopReason::Replaced,
                });
            }
            None => {}
        }

        *current = Some(handle.clone());

        if let Err(e) = handle.play() {
            *current = None;
            warn!(handle = %handle.id(), url = %handle.url(), error = %e, "Play request refused");
            self.emit(SlotEvent::Stopped {
                handle: handle.id(),
                reason: StopReason::Error,
            });
            return Err(e);
        }

        self.emit(SlotEvent::Started {
            handle: handle.id(),
            url: handle.url().to_string(),
        });
        Ok(())
    }

    /// Stop `handle` if it is the playing occupant, otherwise register it.
    ///
    /// Returns whether `handle` is playing afterwards.
    pub fn toggle(&self, handle: &AudioHandle) -> Result<bool> {
        {
            let mut current = self.lock();
            if current.as_ref() == Some(handle) && handle.is_playing() {
                handle.stop();
                *current = None;
                self.emit(SlotEvent::Stopped {
                    handle: handle.id(),
                    reason: StopReason::Toggled,
                });
                return Ok(false);
            }
        }

        self.register(handle)?;
        Ok(true)
    }

    /// Stop and rewind the occupant, leaving the slot empty
    pub fn pause(&self) {
        let previous = self.lock().take();

        if let Some(handle) = previous {
            handle.stop();
            self.emit(SlotEvent::Stopped {
                handle: handle.id(),
                reason: StopReason::Paused,
            });
        }
    }

    /// Clear the slot after natural end or a playback error.
    ///
    /// Does nothing if `handle` no longer occupies the slot.
    pub fn finished(&self, handle: &AudioHandle, reason: StopReason) {
        let mut current = self.lock();
        if current.as_ref() != Some(handle) {
            return;
        }

        *current = None;
        if reason == StopReason::Error {
            handle.pause();
        }
        debug!(handle = %handle.id(), ?reason, "Occupant finished");
        self.emit(SlotEvent::Stopped {
            handle: handle.id(),
            reason,
        });
    }

    /// The current occupant, if any
    pub fn current(&self) -> Option<AudioHandle> {
        self.lock().clone()
    }

    pub fn is_current(&self, handle: &AudioHandle) -> bool {
        self.lock().as_ref() == Some(handle)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    /// Subscribe to slot events
    pub fn subscribe(&self) -> broadcast::Receiver<SlotEvent> {
        self.inner.events.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, Option<AudioHandle>> {
        self.inner
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SlotEvent) {
        // No subscribers is fine
        let _ = self.inner.events.send(event);
    }
}
