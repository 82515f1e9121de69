//! Shared test helpers: scripted media backend and recording play counter.

#![allow(dead_code)]

use async_trait::async_trait;
use clipdeck_core::{ClipError, PlayCounter, SoundId};
use clipdeck_playback::{
    MediaBackend, MediaElement, MediaEvent, PlaybackError, ReadyState, Result,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tokio::sync::broadcast;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// How a mock element behaves once loading begins
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Emits `CanPlay` after `after`, reaching `ready`
    Ready { after: Duration, ready: ReadyState },
    /// Emits `Error` after `after`, having reached `ready`
    Fail { after: Duration, ready: ReadyState },
    /// Emits `Error` after `after` with nothing buffered; data shows up
    /// right after the error has been observed
    FailThenBuffer { after: Duration },
    /// Never emits anything
    Silent,
    /// `create` itself fails
    Unavailable,
    /// Loads normally but `play` is refused
    RefusesPlay,
}

impl Behavior {
    pub fn ready_after(ms: u64) -> Self {
        Behavior::Ready {
            after: Duration::from_millis(ms),
            ready: ReadyState::HaveEnoughData,
        }
    }

    pub fn fail_after(ms: u64, ready: ReadyState) -> Self {
        Behavior::Fail {
            after: Duration::from_millis(ms),
            ready,
        }
    }
}

#[derive(Debug)]
struct ElementState {
    playing: bool,
    has_source: bool,
    ready: ReadyState,
    /// Readiness reached after the next `ready_state` read
    pending_ready: Option<ReadyState>,
    plays: usize,
    rewinds: usize,
}

pub struct MockElement {
    url: String,
    behavior: Behavior,
    state: Arc<Mutex<ElementState>>,
    events: broadcast::Sender<MediaEvent>,
}

impl MockElement {
    fn new(url: &str, behavior: Behavior) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            url: url.to_string(),
            behavior,
            state: Arc::new(Mutex::new(ElementState {
                playing: false,
                has_source: true,
                ready: ReadyState::HaveNothing,
                pending_ready: None,
                plays: 0,
                rewinds: 0,
            })),
            events,
        }
    }

    /// Simulate natural end of playback
    pub fn finish(&self) {
        self.state.lock().unwrap().playing = false;
        let _ = self.events.send(MediaEvent::Ended);
    }

    /// Simulate a playback error
    pub fn fail(&self, message: &str) {
        self.state.lock().unwrap().playing = false;
        let _ = self.events.send(MediaEvent::Error(message.to_string()));
    }

    pub fn plays(&self) -> usize {
        self.state.lock().unwrap().plays
    }

    pub fn rewinds(&self) -> usize {
        self.state.lock().unwrap().rewinds
    }

    /// Live event receivers (loader races and playback watchers)
    pub fn subscribers(&self) -> usize {
        self.events.receiver_count()
    }

    fn emit_later(&self, after: Duration, ready: ReadyState, event: MediaEvent) {
        let state = Arc::clone(&self.state);
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            state.lock().unwrap().ready = ready;
            let _ = events.send(event);
        });
    }
}

impl MediaElement for MockElement {
    fn url(&self) -> &str {
        &self.url
    }

    fn begin_load(&self) {
        match &self.behavior {
            Behavior::Ready { after, ready } => {
                self.emit_later(*after, *ready, MediaEvent::CanPlay);
            }
            Behavior::Fail { after, ready } => {
                self.emit_later(*after, *ready, MediaEvent::Error("network error".into()));
            }
            Behavior::FailThenBuffer { after } => {
                let state = Arc::clone(&self.state);
                let events = self.events.clone();
                let after = *after;
                tokio::spawn(async move {
                    tokio::time::sleep(after).await;
                    state.lock().unwrap().pending_ready = Some(ReadyState::HaveCurrentData);
                    let _ = events.send(MediaEvent::Error("network error".into()));
                });
            }
            Behavior::RefusesPlay => {
                self.emit_later(Duration::ZERO, ReadyState::HaveEnoughData, MediaEvent::CanPlay);
            }
            Behavior::Silent | Behavior::Unavailable => {}
        }
    }

    fn play(&self) -> Result<()> {
        if matches!(self.behavior, Behavior::RefusesPlay) {
            return Err(PlaybackError::media("NotAllowedError"));
        }

        let mut state = self.state.lock().unwrap();
        if !state.has_source {
            return Err(PlaybackError::media("no source"));
        }
        state.playing = true;
        state.plays += 1;
        drop(state);

        let _ = self.events.send(MediaEvent::Playing);
        Ok(())
    }

    fn pause(&self) {
        let mut state = self.state.lock().unwrap();
        if state.playing {
            state.playing = false;
            drop(state);
            let _ = self.events.send(MediaEvent::Paused);
        }
    }

    fn seek_to_start(&self) {
        self.state.lock().unwrap().rewinds += 1;
    }

    fn clear_source(&self) {
        let mut state = self.state.lock().unwrap();
        state.has_source = false;
        state.ready = ReadyState::HaveNothing;
        state.pending_ready = None;
    }

    fn has_source(&self) -> bool {
        self.state.lock().unwrap().has_source
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn ready_state(&self) -> ReadyState {
        let mut state = self.state.lock().unwrap();
        let current = state.ready;
        if let Some(next) = state.pending_ready.take() {
            state.ready = next;
        }
        current
    }

    fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.events.subscribe()
    }
}

/// Backend whose elements follow per-URL scripts
pub struct MockBackend {
    default: Behavior,
    behaviors: Mutex<HashMap<String, Behavior>>,
    created: Mutex<Vec<Arc<MockElement>>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Self::with_default(Behavior::ready_after(10))
    }

    pub fn with_default(default: Behavior) -> Arc<Self> {
        Arc::new(Self {
            default,
            behaviors: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
        })
    }

    pub fn set(&self, url: &str, behavior: Behavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(url.to_string(), behavior);
    }

    pub fn created_urls(&self) -> Vec<String> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.url.clone())
            .collect()
    }

    /// Most recently created element for `url`
    pub fn element(&self, url: &str) -> Arc<MockElement> {
        self.created
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|e| e.url == url)
            .cloned()
            .unwrap_or_else(|| panic!("no element created for {}", url))
    }

    pub fn playing_count(&self) -> usize {
        self.created
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.is_playing())
            .count()
    }
}

impl MediaBackend for MockBackend {
    fn create(&self, url: &str) -> Result<Arc<dyn MediaElement>> {
        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        if matches!(behavior, Behavior::Unavailable) {
            return Err(PlaybackError::media(format!("cannot create element for {}", url)));
        }

        let element = Arc::new(MockElement::new(url, behavior));
        self.created.lock().unwrap().push(Arc::clone(&element));
        Ok(element)
    }
}

/// Play counter that records every notification
#[derive(Default)]
pub struct RecordingCounter {
    plays: Mutex<Vec<SoundId>>,
    fail: bool,
}

impl RecordingCounter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            plays: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn plays(&self) -> Vec<SoundId> {
        self.plays.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlayCounter for RecordingCounter {
    async fn record_play(&self, sound_id: SoundId) -> clipdeck_core::Result<()> {
        self.plays.lock().unwrap().push(sound_id);
        if self.fail {
            return Err(ClipError::network("counter endpoint unreachable"));
        }
        Ok(())
    }
}

/// Let spawned tasks run to completion
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
