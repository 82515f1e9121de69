//! Clipdeck Core
//!
//! Platform-agnostic core types, traits, configuration and error handling
//! shared by the playback coordinator and the API client.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `SoundId`, `SoundRef`, `SoundDetail`
//! - **Core Traits**: `PlayCounter` (fire-and-forget play notifications)
//! - **Configuration**: `ClipConfig`, loaded from file and environment
//! - **Error Handling**: Unified `ClipError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use clipdeck_core::{SoundId, SoundRef};
//!
//! let sound = SoundRef::new(SoundId::new(42), "Air horn")
//!     .with_object_storage_url("https://cdn.example.com/sounds/42.mp3");
//!
//! assert!(sound.has_any_source());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{ClipConfig, RetrySettings, DEFAULT_MEDIA_BASE_URL};
pub use error::{ClipError, Result};
pub use traits::PlayCounter;
pub use types::{SoundDetail, SoundId, SoundRef};
