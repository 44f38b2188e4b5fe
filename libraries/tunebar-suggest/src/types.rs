//! Types for the suggestion backend and its configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tunebar_playback::Track;

/// Default number of suggestions shown under the search box
pub const DEFAULT_MAX_RESULTS: usize = 7;

/// Default quiet period before a search is sent
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Title used when the backend omits one
pub const UNKNOWN_TITLE: &str = "Unknown Song";

/// Configuration for the suggestion client.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Base URL of the search backend (e.g., "http://127.0.0.1:5000")
    pub base_url: String,
    /// Maximum suggestions returned per query
    pub max_results: usize,
    /// Number of cached queries (0 disables the cache)
    pub cache_capacity: usize,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Quiet period before a typed query is searched
    pub debounce: Duration,
    /// Realtime reconnect attempts before giving up
    pub reconnect_attempts: u32,
    /// Backoff step; attempt `n` waits `n * reconnect_backoff`
    pub reconnect_backoff: Duration,
}

impl SuggestConfig {
    /// Create a config with default tuning for the given backend.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_results: DEFAULT_MAX_RESULTS,
            cache_capacity: 64,
            request_timeout: Duration::from_secs(10),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            reconnect_attempts: 3,
            reconnect_backoff: Duration::from_secs(1),
        }
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5000")
    }
}

// =============================================================================
// Wire Types
// =============================================================================

/// Response body of `GET /api/search`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<RawSuggestion>,
}

/// One search hit as the backend sends it; every field may be missing.
///
/// Fields the widget never shows (e.g. `description`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSuggestion {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}

// =============================================================================
// Validated Types
// =============================================================================

/// A search hit that is safe to show and to play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub title: String,
    pub thumbnail: Option<String>,
    pub video_id: String,
}

impl Suggestion {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            thumbnail: None,
            video_id: video_id.into(),
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Validate a wire entry.
    ///
    /// Entries without a usable `video_id` cannot be played and are
    /// dropped. A missing or blank title becomes "Unknown Song"; a blank
    /// thumbnail is treated as missing.
    pub fn from_raw(raw: RawSuggestion) -> Option<Self> {
        let video_id = raw.video_id.filter(|id| !id.trim().is_empty())?;
        let title = raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let thumbnail = raw.thumbnail.filter(|t| !t.trim().is_empty());

        Some(Self {
            title,
            thumbnail,
            video_id,
        })
    }

    /// Wire form of this suggestion
    pub fn to_raw(&self) -> RawSuggestion {
        RawSuggestion {
            title: Some(self.title.clone()),
            thumbnail: self.thumbnail.clone(),
            video_id: Some(self.video_id.clone()),
        }
    }
}

impl From<Suggestion> for Track {
    fn from(suggestion: Suggestion) -> Self {
        let track = Track::new(suggestion.video_id, suggestion.title);
        match suggestion.thumbnail {
            Some(thumbnail) => track.with_thumbnail(thumbnail),
            None => track,
        }
    }
}

/// Validate a batch of wire entries, keeping at most `limit`.
pub fn validate_results(raw: Vec<RawSuggestion>, limit: usize) -> Vec<Suggestion> {
    raw.into_iter()
        .filter_map(Suggestion::from_raw)
        .take(limit)
        .collect()
}
