//! Candidate loader
//!
//! Prepares one candidate at a time for playback. Each attempt races the
//! element's first readiness signal against a short fixed timeout and takes
//! whichever comes first: perceived instant playback matters more than a
//! fully buffered clip.
//!
//! Race safety: every resolution point re-checks the caller's
//! [`RequestTicket`]. A superseded attempt discards its element and reports
//! [`PlaybackError::Superseded`], so nothing stale ever reaches the slot.

use crate::error::{PlaybackError, Result};
use crate::handle::AudioHandle;
use crate::media::{self, MediaBackend, MediaElement, MediaEvent};
use crate::request::RequestTicket;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

/// Default readiness race timeout per candidate
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_millis(100);

/// How one readiness race ended
enum Race {
    Ready,
    TimedOut,
    Errored(String),
    Cancelled,
}

/// Result of one candidate attempt
enum Attempt {
    Ready {
        element: Arc<dyn MediaElement>,
        best_effort: bool,
    },
    Failed {
        reason: String,
        element: Option<Arc<dyn MediaElement>>,
    },
    Superseded,
}

/// Loads candidate URLs through a [`MediaBackend`]
#[derive(Clone)]
pub struct Loader {
    backend: Arc<dyn MediaBackend>,
    ready_timeout: Duration,
}

impl Loader {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        Self {
            backend,
            ready_timeout: DEFAULT_READY_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_ready_timeout(mut self, ready_timeout: Duration) -> Self {
        self.ready_timeout = ready_timeout;
        self
    }

    pub fn ready_timeout(&self) -> Duration {
        self.ready_timeout
    }

    /// Try `candidates` strictly in order and return the first playable handle.
    ///
    /// When every candidate fails, the last errored element is still
    /// returned (flagged best effort) if it has reached non-zero readiness.
    ///
    /// # Errors
    /// * `NoCandidates` - `candidates` is empty; no element is created
    /// * `Superseded` - `ticket` was replaced by a newer request
    /// * `AllCandidatesFailed` - nothing playable was found
    pub async fn load(&self, candidates: &[String], ticket: &RequestTicket) -> Result<AudioHandle> {
        if candidates.is_empty() {
            return Err(PlaybackError::NoCandidates);
        }

        let mut last_failed: Option<(&str, Arc<dyn MediaElement>)> = None;
        let mut last_error = String::new();

        for url in candidates {
            match self.attempt(url, ticket).await {
                Attempt::Ready {
                    element,
                    best_effort,
                } => {
                    if let Some((_, stale)) = last_failed.take() {
                        media::discard(stale.as_ref());
                    }
                    return Ok(AudioHandle::with_best_effort(url.as_str(), element, best_effort));
                }
                Attempt::Superseded => {
                    if let Some((_, stale)) = last_failed.take() {
                        media::discard(stale.as_ref());
                    }
                    return Err(PlaybackError::Superseded);
                }
                Attempt::Failed { reason, element } => {
                    debug!(url = %url, request_id = %ticket.id(), reason = %reason, "Candidate failed, trying next");
                    if let Some(element) = element {
                        if let Some((_, stale)) = last_failed.replace((url.as_str(), element)) {
                            media::discard(stale.as_ref());
                        }
                    }
                    last_error = reason;
                }
            }
        }

        if let Some((url, element)) = last_failed {
            if !ticket.is_current() {
                media::discard(element.as_ref());
                return Err(PlaybackError::Superseded);
            }
            if element.ready_state().is_nonzero() {
                warn!(url = %url, ready_state = ?element.ready_state(), "All candidates failed, playing last one on partial readiness");
                return Ok(AudioHandle::with_best_effort(url, element, true));
            }
            media::discard(element.as_ref());
        }

        if !ticket.is_current() {
            return Err(PlaybackError::Superseded);
        }

        Err(PlaybackError::AllCandidatesFailed {
            attempted: candidates.len(),
            last_error,
        })
    }

    /// Prepare a single URL.
    ///
    /// # Errors
    /// * `Superseded` - `ticket` was replaced by a newer request
    /// * `CandidateFailed` - the element errored with zero readiness
    pub async fn load_one(&self, url: &str, ticket: &RequestTicket) -> Result<AudioHandle> {
        match self.attempt(url, ticket).await {
            Attempt::Ready {
                element,
                best_effort,
            } => Ok(AudioHandle::with_best_effort(url, element, best_effort)),
            Attempt::Superseded => Err(PlaybackError::Superseded),
            Attempt::Failed { reason, element } => {
                if let Some(element) = element {
                    media::discard(element.as_ref());
                }
                Err(PlaybackError::CandidateFailed {
                    url: url.to_string(),
                    reason,
                })
            }
        }
    }

    async fn attempt(&self, url: &str, ticket: &RequestTicket) -> Attempt {
        if !ticket.is_current() {
            return Attempt::Superseded;
        }

        let element = match self.backend.create(url) {
            Ok(element) => element,
            Err(e) => {
                return Attempt::Failed {
                    reason: e.to_string(),
                    element: None,
                }
            }
        };

        let mut events = element.subscribe();
        element.begin_load();

        let deadline = tokio::time::sleep(self.ready_timeout);
        tokio::pin!(deadline);
        let mut events_open = true;

        let race = loop {
            tokio::select! {
                biased;
                () = ticket.cancelled() => break Race::Cancelled,
                event = events.recv(), if events_open => match event {
                    Ok(event) if event.is_readiness() => break Race::Ready,
                    Ok(MediaEvent::Error(reason)) => break Race::Errored(reason),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(url = %url, skipped, "Media events lagged");
                        if element.ready_state().is_nonzero() {
                            break Race::Ready;
                        }
                    }
                    Err(RecvError::Closed) => events_open = false,
                },
                () = &mut deadline => break Race::TimedOut,
            }
        };

        let resolved = match race {
            Race::Cancelled => None,
            Race::Ready | Race::TimedOut => Some(false),
            Race::Errored(reason) => {
                if element.ready_state().is_nonzero() {
                    Some(true)
                } else if ticket.is_current() {
                    return Attempt::Failed {
                        reason,
                        element: Some(element),
                    };
                } else {
                    None
                }
            }
        };

        match resolved {
            Some(best_effort) if ticket.is_current() => Attempt::Ready {
                element,
                best_effort,
            },
            _ => {
                debug!(url = %url, request_id = %ticket.id(), "Discarding superseded load");
                media::discard(element.as_ref());
                Attempt::Superseded
            }
        }
    }
}
