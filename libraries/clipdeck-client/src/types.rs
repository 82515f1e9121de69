//! Types for the sound data provider client.

use crate::error::{ClientError, Result};
use crate::retry::RetryPolicy;
use clipdeck_core::ClipConfig;

/// Configuration for connecting to the sound data provider.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.example.com")
    pub url: String,
    /// Retry policy for detail fetches
    pub retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a config with the default retry policy.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Build from the shared Clipdeck configuration.
    ///
    /// Fails if no API base URL is configured.
    pub fn from_clip_config(config: &ClipConfig) -> Result<Self> {
        let url = config
            .api_base_url
            .clone()
            .ok_or_else(|| ClientError::InvalidUrl("API base URL is not configured".into()))?;

        Ok(Self::new(url).with_retry(config.retry().into()))
    }
}
