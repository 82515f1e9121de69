//! Clipdeck configuration
use crate::error::{ClipError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Media base URL used when none is configured
pub const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:8000/media";

/// Runtime configuration for the playback coordinator and API client.
///
/// Loaded from an optional TOML file, then overridden by `CLIPDECK_*`
/// environment variables (e.g. `CLIPDECK_MEDIA_BASE_URL`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ClipConfig {
    /// Base URL of the sound data provider API (e.g. "https://api.example.com")
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Base URL that relative media paths are joined onto
    #[serde(default = "default_media_base_url")]
    pub media_base_url: String,

    /// How long the loader waits for a readiness signal per candidate
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,

    /// How long a button shows its pressed state after a trigger
    #[serde(default = "default_press_feedback_ms")]
    pub press_feedback_ms: u64,

    /// Total attempts for sound detail fetches
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,

    /// Delay before the second attempt; doubles after each failure
    #[serde(default = "default_retry_initial_delay_ms")]
    pub retry_initial_delay_ms: u64,
}

/// Retry parameters derived from [`ClipConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failure
    pub initial_delay: Duration,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            media_base_url: default_media_base_url(),
            ready_timeout_ms: default_ready_timeout_ms(),
            press_feedback_ms: default_press_feedback_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_initial_delay_ms: default_retry_initial_delay_ms(),
        }
    }
}

impl ClipConfig {
    /// Load configuration from `clipdeck.toml` (if present) and environment
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("clipdeck.toml"))
    }

    /// Load configuration from the given file (if present) and environment
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut settings = config::Config::builder();

        if path.exists() {
            settings = settings.add_source(config::File::from(path));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CLIPDECK").try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !is_http_url(&self.media_base_url) {
            return Err(ClipError::config(format!(
                "media_base_url must start with http:// or https:// (got {:?})",
                self.media_base_url
            )));
        }

        if let Some(api) = &self.api_base_url {
            if !is_http_url(api) {
                return Err(ClipError::config(format!(
                    "api_base_url must start with http:// or https:// (got {:?})",
                    api
                )));
            }
        }

        if self.ready_timeout_ms == 0 {
            return Err(ClipError::config("ready_timeout_ms must be positive"));
        }

        Ok(())
    }

    /// Readiness race timeout per candidate
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }

    /// Pressed-state duration
    pub fn press_feedback(&self) -> Duration {
        Duration::from_millis(self.press_feedback_ms)
    }

    /// Retry parameters for detail fetches
    pub fn retry(&self) -> RetrySettings {
        RetrySettings {
            max_attempts: self.retry_max_attempts,
            initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
        }
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// Default values
fn default_media_base_url() -> String {
    DEFAULT_MEDIA_BASE_URL.to_string()
}

fn default_ready_timeout_ms() -> u64 {
    100
}

fn default_press_feedback_ms() -> u64 {
    150
}

fn default_retry_max_attempts() -> u32 {
    3
}

fn default_retry_initial_delay_ms() -> u64 {
    500
}
