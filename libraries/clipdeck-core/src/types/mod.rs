//! Core domain types for Clipdeck
mod ids;
mod sound;

pub use ids::SoundId;
pub use sound::{SoundDetail, SoundRef};
