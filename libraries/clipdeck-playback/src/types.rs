//! Core types for sound button coordination

use serde::{Deserialize, Serialize};

/// Visible playback state of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    /// Nothing playing for this button
    Idle,

    /// Resolving and loading a source
    Loading,

    /// This button's handle occupies the slot and plays
    Playing,
}

/// What a single trigger did
///
/// Triggers never fail; absorbed failures are reported here and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerOutcome {
    /// A freshly loaded handle started playing
    Started,

    /// The button's existing handle was started again
    Resumed,

    /// The button's handle was playing and got stopped
    Stopped,

    /// A newer trigger took over before this one finished
    Superseded,

    /// The sound has no playable source
    NoSource,

    /// Every candidate failed, or the platform refused to play
    Failed,
}
