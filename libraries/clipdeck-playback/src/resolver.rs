//! Candidate source resolution
//!
//! Turns a [`SoundRef`] into an ordered list of URLs worth trying:
//! direct API endpoint, then object storage, then media-base-derived path.

use clipdeck_core::{ClipConfig, SoundRef, DEFAULT_MEDIA_BASE_URL};
use url::Url;

/// Builds candidate playback URLs for a sound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateResolver {
    api_base_url: Option<String>,
    media_base_url: String,
}

impl Default for CandidateResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_BASE_URL)
    }
}

impl CandidateResolver {
    /// Resolver without an API base; direct endpoints are only taken from records
    pub fn new(media_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: None,
            media_base_url: media_base_url.into(),
        }
    }

    #[must_use]
    pub fn with_api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(api_base_url.into());
        self
    }

    pub fn from_config(config: &ClipConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.clone(),
            media_base_url: config.media_base_url.clone(),
        }
    }

    /// Candidate URLs in preference order, without duplicates.
    ///
    /// An empty list means the sound has no audio available.
    pub fn resolve(&self, sound: &SoundRef) -> Vec<String> {
        let candidates = [
            self.direct_api_candidate(sound),
            object_storage_candidate(sound),
            self.media_path_candidate(sound),
        ];

        let mut resolved: Vec<String> = Vec::with_capacity(candidates.len());
        for candidate in candidates.into_iter().flatten() {
            if !resolved.contains(&candidate) {
                resolved.push(candidate);
            }
        }
        resolved
    }

    fn direct_api_candidate(&self, sound: &SoundRef) -> Option<String> {
        match sound.direct_api_url() {
            Some(url) if is_absolute(url) => Some(url.to_string()),
            Some(path) => self.api_base_url.as_deref().map(|base| join(base, path)),
            None => self
                .api_base_url
                .as_deref()
                .map(|base| join(base, &format!("api/sounds/{}/audio", sound.id))),
        }
    }

    fn media_path_candidate(&self, sound: &SoundRef) -> Option<String> {
        sound
            .relative_media_path()
            .map(|path| join(&self.media_base_url, path))
    }
}

fn object_storage_candidate(sound: &SoundRef) -> Option<String> {
    sound
        .object_storage_url()
        .filter(|url| is_absolute(url))
        .map(str::to_string)
}

fn is_absolute(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

fn join(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
