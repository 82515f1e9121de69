//! Clipdeck Sound Client
//!
//! HTTP client for the sound data provider that backs Clipdeck pages.
//!
//! # Features
//!
//! - **Sound details**: Fetch a sound's detail record by id
//! - **Retry**: Bounded exponential backoff that fails fast on "not found"
//! - **Counters**: Record plays and views; usable as a [`clipdeck_core::PlayCounter`]
//!
//! # Example
//!
//! ```ignore
//! use clipdeck_client::{ClientConfig, SoundClient};
//! use clipdeck_core::{ClipConfig, SoundId};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_clip_config(&ClipConfig::load()?)?;
//!     let client = SoundClient::new(config)?;
//!
//!     let detail = client.get_sound_with_retry(SoundId::new(42)).await?;
//!     client.record_view(detail.sound.id).await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
pub mod retry;
mod types;

// Re-export main types
pub use client::SoundClient;
pub use error::{ClientError, Result};
pub use retry::{retry, Retryable, RetryPolicy, Sleeper, TokioSleeper};
pub use types::ClientConfig;
