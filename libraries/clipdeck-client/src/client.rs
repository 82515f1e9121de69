//! Sound data provider client.

use crate::error::{ClientError, Result};
use crate::retry::{self, RetryPolicy, Sleeper, TokioSleeper};
use crate::types::ClientConfig;
use async_trait::async_trait;
use clipdeck_core::{PlayCounter, SoundDetail, SoundId};
use reqwest::{Client, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the sound data provider and its play/view counters.
///
/// # Example
///
/// ```ignore
/// use clipdeck_client::{ClientConfig, SoundClient};
/// use clipdeck_core::SoundId;
///
/// let client = SoundClient::new(ClientConfig::new("https://api.example.com"))?;
///
/// // Retries transient failures, fails fast on 404
/// let detail = client.get_sound_with_retry(SoundId::new(42)).await?;
/// println!("{} has been played {} times", detail.sound.name, detail.play_count);
/// ```
#[derive(Clone)]
pub struct SoundClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl SoundClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        url::Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Clipdeck/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            retry: config.retry,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Use a custom delay provider for retries.
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Get the normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fetch a sound's detail record (single attempt).
    pub async fn get_sound(&self, sound_id: SoundId) -> Result<SoundDetail> {
        let url = format!("{}/api/sounds/{}", self.base_url, sound_id);
        debug!(url = %url, sound_id = %sound_id, "Fetching sound");

        let response = self.http.get(&url).send().await.map_err(map_send_error)?;
        let response = check_status(response, || format!("Sound {}", sound_id)).await?;

        response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse sound response: {}", e))
        })
    }

    /// Fetch a sound's detail record, retrying transient failures.
    ///
    /// A 404 fails immediately; other failures are retried with exponential
    /// backoff and the last error is returned once attempts run out.
    pub async fn get_sound_with_retry(&self, sound_id: SoundId) -> Result<SoundDetail> {
        retry::retry(self.retry, self.sleeper.as_ref(), || self.get_sound(sound_id)).await
    }

    /// Count one playback of a sound.
    pub async fn record_play(&self, sound_id: SoundId) -> Result<()> {
        self.post_counter(sound_id, "play").await
    }

    /// Count one detail page view of a sound.
    pub async fn record_view(&self, sound_id: SoundId) -> Result<()> {
        self.post_counter(sound_id, "view").await
    }

    async fn post_counter(&self, sound_id: SoundId, counter: &str) -> Result<()> {
        let url = format!("{}/api/sounds/{}/{}", self.base_url, sound_id, counter);
        debug!(url = %url, sound_id = %sound_id, counter, "Recording counter");

        let response = self.http.post(&url).send().await.map_err(map_send_error)?;
        check_status(response, || format!("Sound {}", sound_id)).await?;

        info!(sound_id = %sound_id, counter, "Counter recorded");
        Ok(())
    }
}

#[async_trait]
impl PlayCounter for SoundClient {
    async fn record_play(&self, sound_id: SoundId) -> clipdeck_core::Result<()> {
        SoundClient::record_play(self, sound_id)
            .await
            .map_err(Into::into)
    }
}

fn map_send_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::ServerUnreachable(e.to_string())
    } else {
        ClientError::Request(e)
    }
}

/// Map non-success statuses to errors.
async fn check_status(response: Response, what: impl FnOnce() -> String) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(what()))
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        })
    } else {
        let error_text = response.text().await.unwrap_or_default();
        Err(ClientError::ServerError {
            status: status.as_u16(),
            message: error_text,
        })
    }
}
