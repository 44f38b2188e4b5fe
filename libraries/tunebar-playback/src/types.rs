//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;

/// Track information for queue management
///
/// The `id` doubles as the opaque source locator: a [`StreamResolver`]
/// turns it into something the sink can load. Tracks are never mutated
/// after they are enqueued; the queue only hands out references and clones.
///
/// [`StreamResolver`]: crate::StreamResolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Backend identifier (the search backend's `video_id`)
    pub id: String,

    /// Display title
    pub title: String,

    /// Thumbnail URL, if the backend provided one
    pub thumbnail: Option<String>,
}

impl Track {
    /// Create a track without a thumbnail
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            thumbnail: None,
        }
    }

    /// Attach a thumbnail URL
    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }
}

/// Queue-assigned identity of one occurrence of a track
///
/// The queue does not de-duplicate, so the same [`Track`] may appear more
/// than once. Entry ids tell those occurrences apart across reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One slot of the queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    id: EntryId,
    track: Track,
}

impl QueueEntry {
    pub(crate) fn new(id: EntryId, track: Track) -> Self {
        Self { id, track }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn track(&self) -> &Track {
        &self.track
    }
}

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportState {
    /// Nothing playing; the sink is rewound
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Advance through the queue once
    #[default]
    Off,

    /// Replay the current track
    Single,

    /// Loop the entire queue
    All,
}

impl RepeatMode {
    /// Next mode in the fixed cycle Off → Single → All → Off
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::Single,
            RepeatMode::Single => RepeatMode::All,
            RepeatMode::All => RepeatMode::Off,
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RepeatMode::Off => "off",
            RepeatMode::Single => "single",
            RepeatMode::All => "all",
        };
        f.write_str(label)
    }
}

/// Configuration for the player
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial repeat mode (default: Off)
    #[serde(default)]
    pub repeat: RepeatMode,
}
