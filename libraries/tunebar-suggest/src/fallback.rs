//! Static fallback catalogue
//!
//! Served when every live source failed, so the suggestion list never
//! comes back empty because of an outage.

use crate::error::Result;
use crate::source::SuggestionSource;
use crate::types::Suggestion;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use tracing::debug;

/// Well-known songs: (video_id, title)
const FALLBACK_SONGS: [(&str, &str); 5] = [
    ("JGwWNGJdvx8", "Shape of You"),
    ("4NRXx6U8ABQ", "Blinding Lights"),
    ("TUVcZfQe-Kw", "Levitating"),
    ("q0hyYWKXF0Q", "Dance Monkey"),
    ("zABLecsR5UE", "Someone You Loved"),
];

/// Thumbnail URL for a video id
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{}/default.jpg", video_id)
}

/// Source that answers every query with a random sample of the catalogue
#[derive(Debug, Clone, Default)]
pub struct FallbackCatalogue;

impl FallbackCatalogue {
    pub fn new() -> Self {
        Self
    }

    /// Every song in the catalogue, in catalogue order
    pub fn songs(&self) -> Vec<Suggestion> {
        FALLBACK_SONGS
            .iter()
            .map(|(id, title)| Suggestion::new(*id, *title).with_thumbnail(thumbnail_url(id)))
            .collect()
    }

    /// Up to `limit` distinct songs in random order
    pub fn sample(&self, limit: usize) -> Vec<Suggestion> {
        let songs = self.songs();
        let mut rng = rand::thread_rng();
        let picked: Vec<Suggestion> = songs.choose_multiple(&mut rng, limit).cloned().collect();
        debug!(count = picked.len(), "Providing fallback songs");
        picked
    }
}

#[async_trait]
impl SuggestionSource for FallbackCatalogue {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn search(&self, _query: &str, limit: usize) -> Result<Vec<Suggestion>> {
        Ok(self.sample(limit))
    }
}
