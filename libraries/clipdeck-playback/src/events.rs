//! Playback slot events
//!
//! Emitted by [`PlaybackSlot`](crate::PlaybackSlot) whenever the occupant
//! starts or stops, so UI layers can mirror the global playing state.

use crate::handle::HandleId;
use serde::{Deserialize, Serialize};

/// Why a handle stopped occupying the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Another handle was registered
    Replaced,
    /// `pause()` was called
    Paused,
    /// The owning button toggled it off
    Toggled,
    /// Playback reached the end
    Ended,
    /// The element reported an error, or refused to play
    Error,
}

/// Events emitted by the playback slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotEvent {
    /// A handle became the occupant and started playing
    Started {
        /// ID of the new occupant
        handle: HandleId,
        /// URL it plays
        url: String,
    },

    /// The occupant was stopped and the slot cleared
    Stopped {
        /// ID of the former occupant
        handle: HandleId,
        reason: StopReason,
    },
}

impl SlotEvent {
    /// Handle this event is about
    pub fn handle(&self) -> HandleId {
        match self {
            SlotEvent::Started { handle, .. } | SlotEvent::Stopped { handle, .. } => *handle,
        }
    }
}
