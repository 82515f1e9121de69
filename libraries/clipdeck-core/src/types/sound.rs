//! Sound records as delivered by the sound data provider
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SoundId;

/// A playable clip ("sound button") as seen by the playback coordinator.
///
/// Carries zero or more candidate source locations. The coordinator never
/// mutates a `SoundRef`; it is owned by the page/view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundRef {
    /// Stable, unique identifier
    pub id: SoundId,

    /// Display name
    pub name: String,

    /// Direct API playback endpoint (absolute, or relative to the API base)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_api_url: Option<String>,

    /// Fully-qualified remote object-storage URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_storage_url: Option<String>,

    /// Path relative to the configured media base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_media_path: Option<String>,
}

impl SoundRef {
    /// Create a sound with no candidate sources
    pub fn new(id: SoundId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            direct_api_url: None,
            object_storage_url: None,
            relative_media_path: None,
        }
    }

    /// Set the direct API playback endpoint
    #[must_use]
    pub fn with_direct_api_url(mut self, url: impl Into<String>) -> Self {
        self.direct_api_url = Some(url.into());
        self
    }

    /// Set the object-storage URL
    #[must_use]
    pub fn with_object_storage_url(mut self, url: impl Into<String>) -> Self {
        self.object_storage_url = Some(url.into());
        self
    }

    /// Set the relative media path
    #[must_use]
    pub fn with_relative_media_path(mut self, path: impl Into<String>) -> Self {
        self.relative_media_path = Some(path.into());
        self
    }

    /// Direct API URL, ignoring blank values
    pub fn direct_api_url(&self) -> Option<&str> {
        non_blank(self.direct_api_url.as_deref())
    }

    /// Object-storage URL, ignoring blank values
    pub fn object_storage_url(&self) -> Option<&str> {
        non_blank(self.object_storage_url.as_deref())
    }

    /// Relative media path, ignoring blank values
    pub fn relative_media_path(&self) -> Option<&str> {
        non_blank(self.relative_media_path.as_deref())
    }

    /// Whether the record carries any candidate source field at all
    pub fn has_any_source(&self) -> bool {
        self.direct_api_url().is_some()
            || self.object_storage_url().is_some()
            || self.relative_media_path().is_some()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Sound detail record used to hydrate a sound's detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundDetail {
    /// Playable part of the record
    #[serde(flatten)]
    pub sound: SoundRef,

    /// Clip length in seconds, if known
    #[serde(default)]
    pub duration_seconds: Option<f64>,

    /// Confirmed playback starts
    #[serde(default)]
    pub play_count: u64,

    /// Detail page views
    #[serde(default)]
    pub view_count: u64,

    /// Audio file downloads
    #[serde(default)]
    pub download_count: u64,

    /// Users who favorited the sound
    #[serde(default)]
    pub favorite_count: u64,

    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,

    /// When the sound was uploaded
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
