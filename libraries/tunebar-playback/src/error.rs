//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Index out of bounds
    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(usize),

    /// Reorder request does not contain exactly the queued entries
    #[error("Reorder is not a permutation of the queue: {0}")]
    NotAPermutation(String),

    /// The resolver could not produce a playable locator
    #[error("Cannot resolve stream for track '{0}'")]
    Unresolvable(String),

    /// Audio sink error
    #[error("Audio sink error: {0}")]
    Sink(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
