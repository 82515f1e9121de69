//! Sound button controller
//!
//! Per-button state machine: `Idle -> Loading -> Playing -> Idle`, with a
//! cosmetic pressed flag raised for a short while after every trigger.
//!
//! A button that already owns a live handle just toggles it through the
//! slot. Otherwise it silences the slot, issues a new request ticket, and
//! runs resolve -> load -> register. Only the latest ticket may register.

use crate::coordinator::Services;
use crate::error::PlaybackError;
use crate::events::StopReason;
use crate::handle::AudioHandle;
use crate::media::MediaEvent;
use crate::request::{RequestId, RequestSequencer, RequestTicket};
use crate::slot::PlaybackSlot;
use crate::types::{ButtonState, TriggerOutcome};
use clipdeck_core::{PlayCounter, SoundId, SoundRef};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::Instant;
use tracing::{debug, info, warn};

#[derive(Default)]
struct ButtonInner {
    handle: Option<AudioHandle>,
    loading: Option<RequestId>,
    pressed_until: Option<Instant>,
}

/// Controller for one rendered sound button
pub struct SoundButton {
    sound: SoundRef,
    services: Services,
    requests: RequestSequencer,
    inner: Mutex<ButtonInner>,
}

impl SoundButton {
    pub(crate) fn new(sound: SoundRef, services: Services) -> Self {
        Self {
            sound,
            services,
            requests: RequestSequencer::new(),
            inner: Mutex::new(ButtonInner::default()),
        }
    }

    pub fn sound(&self) -> &SoundRef {
        &self.sound
    }

    /// Current state, derived from the shared slot
    pub fn state(&self) -> ButtonState {
        let inner = self.lock();
        if inner.loading.is_some() {
            return ButtonState::Loading;
        }

        match &inner.handle {
            Some(handle) if self.services.slot.is_current(handle) && handle.is_playing() => {
                ButtonState::Playing
            }
            _ => ButtonState::Idle,
        }
    }

    /// Whether the pressed visual feedback is showing
    pub fn is_pressed(&self) -> bool {
        self.lock()
            .pressed_until
            .is_some_and(|until| Instant::now() < until)
    }

    /// The handle this button currently owns, if any
    pub fn handle(&self) -> Option<AudioHandle> {
        self.lock().handle.clone()
    }

    /// Handle a user interaction.
    ///
    /// Never fails: playback problems are logged and leave the button idle.
    pub async fn trigger(&self) -> TriggerOutcome {
        if let Some(handle) = self.press() {
            return self.toggle(&handle);
        }

        let ticket = {
            let mut inner = self.lock();
            // Silence everything before any async work starts
            self.services.slot.pause();
            let ticket = self.requests.issue();
            inner.loading = Some(ticket.id());
            ticket
        };

        let candidates = self.services.resolver.resolve(&self.sound);
        if candidates.is_empty() {
            warn!(sound_id = %self.sound.id, name = %self.sound.name, "No playable source for sound");
            self.finish_request(&ticket);
            return TriggerOutcome::NoSource;
        }

        debug!(
            sound_id = %self.sound.id,
            request_id = %ticket.id(),
            candidates = candidates.len(),
            "Loading sound"
        );

        match self.services.loader.load(&candidates, &ticket).await {
            Ok(handle) => self.start(handle, &ticket),
            Err(PlaybackError::Superseded) => {
                debug!(sound_id = %self.sound.id, request_id = %ticket.id(), "Load superseded");
                TriggerOutcome::Superseded
            }
            Err(e) => {
                warn!(sound_id = %self.sound.id, request_id = %ticket.id(), error = %e, "Sound could not be played");
                self.finish_request(&ticket);
                TriggerOutcome::Failed
            }
        }
    }

    /// Raise the pressed flag and return the live handle, dropping a dead one
    fn press(&self) -> Option<AudioHandle> {
        let mut inner = self.lock();
        inner.pressed_until = Some(Instant::now() + self.services.press_feedback);

        if inner.loading.is_some() {
            return None;
        }

        match inner.handle.take() {
            Some(handle) if handle.is_valid() => {
                inner.handle = Some(handle.clone());
                Some(handle)
            }
            Some(stale) => {
                debug!(sound_id = %self.sound.id, handle = %stale.id(), "Dropping invalidated handle");
                None
            }
            None => None,
        }
    }

    fn toggle(&self, handle: &AudioHandle) -> TriggerOutcome {
        match self.services.slot.toggle(handle) {
            Ok(true) => {
                self.notify_play();
                TriggerOutcome::Resumed
            }
            Ok(false) => TriggerOutcome::Stopped,
            Err(e) => {
                warn!(sound_id = %self.sound.id, error = %e, "Resume failed");
                self.lock().handle = None;
                handle.discard();
                TriggerOutcome::Failed
            }
        }
    }

    fn start(&self, handle: AudioHandle, ticket: &RequestTicket) -> TriggerOutcome {
        let mut inner = self.lock();

        // Final check, under the same lock that issues tickets
        if !ticket.is_current() {
            handle.discard();
            return TriggerOutcome::Superseded;
        }

        inner.loading = None;
        if let Some(previous) = inner.handle.replace(handle.clone()) {
            previous.discard();
        }

        let events = handle.subscribe();
        if let Err(e) = self.services.slot.register(&handle) {
            warn!(sound_id = %self.sound.id, url = %handle.url(), error = %e, "Sound could not be played");
            inner.handle = None;
            handle.discard();
            return TriggerOutcome::Failed;
        }
        drop(inner);

        info!(
            sound_id = %self.sound.id,
            url = %handle.url(),
            best_effort = handle.is_best_effort(),
            "Playing sound"
        );
        spawn_watcher(events, &handle, self.services.slot.clone());
        self.notify_play();
        TriggerOutcome::Started
    }

    fn finish_request(&self, ticket: &RequestTicket) {
        let mut inner = self.lock();
        if inner.loading == Some(ticket.id()) {
            inner.loading = None;
        }
    }

    /// Fire-and-forget play counter notification
    fn notify_play(&self) {
        if let Some(counter) = &self.services.counter {
            spawn_play_notification(Arc::clone(counter), self.sound.id);
        }
    }

    fn lock(&self) -> MutexGuard<'_, ButtonInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SoundButton {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = inner.handle.take() {
            self.services.slot.finished(&handle, StopReason::Paused);
            handle.discard();
        }
    }
}

fn spawn_play_notification(counter: Arc<dyn PlayCounter>, sound_id: SoundId) {
    tokio::spawn(async move {
        if let Err(e) = counter.record_play(sound_id).await {
            debug!(sound_id = %sound_id, error = %e, "Play counter notification failed");
        }
    });
}

/// Forward end/error events of a registered handle to the slot.
///
/// Exits once the handle is released. A playback error invalidates the
/// handle so the next trigger resolves and loads again.
fn spawn_watcher(
    mut events: broadcast::Receiver<MediaEvent>,
    handle: &AudioHandle,
    slot: PlaybackSlot,
) {
    let released = handle.released();
    let handle = handle.downgrade();

    tokio::spawn(async move {
        tokio::pin!(released);

        loop {
            let event = tokio::select! {
                biased;
                () = &mut released => break,
                event = events.recv() => event,
            };

            let reason = match event {
                Ok(MediaEvent::Ended) => StopReason::Ended,
                Ok(MediaEvent::Error(message)) => {
                    warn!(error = %message, "Playback error");
                    StopReason::Error
                }
                Ok(_) | Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            };

            let Some(handle) = handle.upgrade() else {
                break;
            };
            slot.finished(&handle, reason);

            if reason == StopReason::Error {
                handle.discard();
                break;
            }
        }
    });
}
