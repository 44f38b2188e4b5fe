//! Player events
//!
//! Event-based communication for UI synchronization. Events queue up inside
//! the transport and the UI drains them whenever it redraws:
//! - State changes (play/pause/stop)
//! - Track changes (skip, repeat, natural end)
//! - Queue, repeat and shuffle changes
//! - Errors swallowed at the player boundary

use crate::types::{RepeatMode, TransportState};
use serde::{Deserialize, Serialize};

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// Transport state changed
    StateChanged {
        /// The new transport state
        state: TransportState,
    },

    /// A different track is now current
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Queue changed (tracks added/cleared/reordered)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Repeat mode changed
    RepeatChanged { mode: RepeatMode },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// An operation failed and was turned into a no-op
    Error {
        /// Error message
        message: String,
    },
}

/// Receiver of "please refresh the display" requests
///
/// The UI binding implements this; controllers call it after they changed
/// something the user can see.
pub trait UiNotifier: Send + Sync {
    fn request_refresh(&self);
}

/// Notifier for hosts that redraw on their own schedule
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl UiNotifier for NoopNotifier {
    fn request_refresh(&self) {}
}
