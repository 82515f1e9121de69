//! Per-button request sequencing
//!
//! Every press that needs to resolve and load a source gets a fresh
//! [`RequestTicket`]. Issuing a new ticket supersedes every older one: the
//! older ticket's cancellation token fires and `is_current()` turns false.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Monotonically increasing request identifier (per button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues tickets and tracks the latest one
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, cancelling the previous one
    pub fn issue(&self) -> RequestTicket {
        let token = CancellationToken::new();
        let (id, previous) = {
            // Id and token swap under one lock
            let mut cancel = self.cancel.lock().unwrap_or_else(PoisonError::into_inner);
            let id = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
            (id, cancel.replace(token.clone()))
        };

        if let Some(previous) = previous {
            previous.cancel();
        }

        RequestTicket {
            id: RequestId(id),
            latest: Arc::clone(&self.latest),
            token,
        }
    }

    /// Most recently issued request, if any
    pub fn latest(&self) -> Option<RequestId> {
        match self.latest.load(Ordering::Acquire) {
            0 => None,
            id => Some(RequestId(id)),
        }
    }
}

/// Proof of one resolve-and-load attempt
#[derive(Debug, Clone)]
pub struct RequestTicket {
    id: RequestId,
    latest: Arc<AtomicU64>,
    token: CancellationToken,
}

impl RequestTicket {
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Whether no newer ticket has been issued by the same sequencer
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.id.0 && !self.token.is_cancelled()
    }

    /// Resolves once this ticket has been superseded
    pub fn cancelled(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}
