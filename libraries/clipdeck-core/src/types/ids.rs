//! ID types for Clipdeck entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sound identifier, as assigned by the sound data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundId(i64);

impl SoundId {
    /// Create a new sound ID
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner value
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SoundId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}
