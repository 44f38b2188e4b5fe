//! Tunebar - Playback Core
//!
//! Platform-agnostic queue and transport logic for the Tunebar widget.
//!
//! This crate provides:
//! - Queue store with a current-track pointer
//! - Transport state machine (Stopped / Playing / Paused)
//! - Repeat modes (Off, Single, All)
//! - Shuffle (Fisher-Yates, seedable)
//! - Skip controller with UI refresh requests
//! - Playback counters with a single snapshot query
//!
//! # Architecture
//!
//! `tunebar-playback` never touches audio bytes or the network. The host
//! supplies an [`AudioSink`] (whatever makes sound) and a
//! [`StreamResolver`] (track id to playable locator). [`Player`] wires the
//! components together and is the only type a UI needs.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tunebar_playback::{
//!     AudioSink, NoopNotifier, Player, PlayerConfig, Result, TemplateResolver, Track,
//!     TransportState,
//! };
//!
//! struct SilentSink;
//!
//! impl AudioSink for SilentSink {
//!     fn load(&mut self, _locator: &str) -> Result<()> { Ok(()) }
//!     fn start(&mut self) -> Result<()> { Ok(()) }
//!     fn pause(&mut self) -> Result<()> { Ok(()) }
//!     fn resume(&mut self) -> Result<()> { Ok(()) }
//!     fn stop(&mut self) -> Result<()> { Ok(()) }
//!     fn has_ended(&self) -> bool { false }
//! }
//!
//! let mut player = Player::new(
//!     PlayerConfig::default(),
//!     Box::new(SilentSink),
//!     Box::new(TemplateResolver::new("https://www.youtube.com/watch?v={video_id}")),
//!     Arc::new(NoopNotifier),
//! );
//!
//! player.enqueue(Track::new("JGwWNGJdvx8", "Shape of You"));
//! player.enqueue(Track::new("4NRXx6U8ABQ", "Blinding Lights"));
//!
//! assert_eq!(player.toggle_play_pause(), TransportState::Playing);
//! assert_eq!(player.skip_next().unwrap().title, "Blinding Lights");
//! assert_eq!(player.metrics().plays, 2);
//! ```

pub mod error;
pub mod events;
pub mod metrics;
pub mod player;
pub mod queue;
pub mod repeat;
pub mod shuffle;
pub mod sink;
pub mod skip;
pub mod transport;
pub mod types;

// Re-exports
pub use error::{PlaybackError, Result};
pub use events::{NoopNotifier, PlayerEvent, UiNotifier};
pub use metrics::{MetricsSnapshot, PlaybackMetrics};
pub use player::Player;
pub use queue::{Advance, Queue, Retreat};
pub use repeat::RepeatPolicy;
pub use shuffle::ShufflePolicy;
pub use sink::{AudioSink, StreamResolver, TemplateResolver};
pub use skip::SkipController;
pub use transport::{Skip, TrackEndedHandler, Transport};
pub use types::{EntryId, PlayerConfig, QueueEntry, RepeatMode, Track, TransportState};
