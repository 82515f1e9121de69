//! Audio handles
//!
//! An [`AudioHandle`] wraps one media element bound to one resolved URL.
//! Handles are cheap to clone; all clones refer to the same element and
//! compare equal.

use crate::error::Result;
use crate::media::{self, MediaElement, MediaEvent, ReadyState};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};

static NEXT_HANDLE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique handle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(u64);

impl HandleId {
    fn next() -> Self {
        Self(NEXT_HANDLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

struct HandleInner {
    id: HandleId,
    url: String,
    element: Arc<dyn MediaElement>,
    best_effort: bool,
    released: CancellationToken,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        self.released.cancel();
    }
}

/// Playable resource bound to exactly one resolved URL
#[derive(Clone)]
pub struct AudioHandle {
    inner: Arc<HandleInner>,
}

impl AudioHandle {
    /// Wrap a loaded element
    pub fn new(url: impl Into<String>, element: Arc<dyn MediaElement>) -> Self {
        Self::with_best_effort(url, element, false)
    }

    pub(crate) fn with_best_effort(
        url: impl Into<String>,
        element: Arc<dyn MediaElement>,
        best_effort: bool,
    ) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                id: HandleId::next(),
                url: url.into(),
                element,
                best_effort,
                released: CancellationToken::new(),
            }),
        }
    }

    pub fn id(&self) -> HandleId {
        self.inner.id
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Whether the element reported an error and is played on partial readiness
    pub fn is_best_effort(&self) -> bool {
        self.inner.best_effort
    }

    pub fn is_playing(&self) -> bool {
        self.inner.element.is_playing()
    }

    /// A handle stays valid while its element still has a source attached
    pub fn is_valid(&self) -> bool {
        self.inner.element.has_source()
    }

    pub fn ready_state(&self) -> ReadyState {
        self.inner.element.ready_state()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.inner.element.subscribe()
    }

    pub(crate) fn play(&self) -> Result<()> {
        self.inner.element.play()
    }

    pub(crate) fn pause(&self) {
        self.inner.element.pause();
    }

    /// Pause and rewind to the start
    pub(crate) fn stop(&self) {
        self.inner.element.pause();
        self.inner.element.seek_to_start();
    }

    /// Stop and release the source; the handle becomes invalid
    pub(crate) fn discard(&self) {
        media::discard(self.inner.element.as_ref());
        self.inner.released.cancel();
    }

    /// Resolves once the handle is discarded or its last clone is dropped
    pub(crate) fn released(&self) -> WaitForCancellationFutureOwned {
        self.inner.released.clone().cancelled_owned()
    }

    pub(crate) fn downgrade(&self) -> WeakAudioHandle {
        WeakAudioHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl PartialEq for AudioHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for AudioHandle {}

impl fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioHandle")
            .field("id", &self.inner.id)
            .field("url", &self.inner.url)
            .field("best_effort", &self.inner.best_effort)
            .finish()
    }
}

/// Non-owning reference used by background watchers
#[derive(Clone)]
pub(crate) struct WeakAudioHandle {
    inner: Weak<HandleInner>,
}

impl WeakAudioHandle {
    pub(crate) fn upgrade(&self) -> Option<AudioHandle> {
        self.inner.upgrade().map(|inner| AudioHandle { inner })
    }
}
