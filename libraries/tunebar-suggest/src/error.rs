//! Error types for the suggestion client.

use thiserror::Error;

/// Errors that can occur while fetching suggestions.
#[derive(Error, Debug)]
pub enum SuggestError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid backend URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse backend response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Realtime channel could not be opened
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Realtime channel is not connected (a reconnect may be running)
    #[error("Realtime channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// Reconnect attempts exhausted; only `reinitialize` brings it back
    #[error("Gave up reconnecting after {attempts} attempts")]
    GaveUp { attempts: u32 },

    /// Unexpected message on the realtime channel
    #[error("Protocol error: {0}")]
    Protocol(String),
}

/// Result type for suggestion operations.
pub type Result<T> = std::result::Result<T, SuggestError>;
