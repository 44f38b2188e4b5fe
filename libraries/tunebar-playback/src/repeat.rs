//! Repeat policy
//!
//! Decides what the transport does when the sink reports that a track
//! ended. Cycling the mode never touches the transport.

use crate::{
    error::Result,
    metrics::PlaybackMetrics,
    transport::{Skip, Transport, TrackEndedHandler},
    types::RepeatMode,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Repeat mode holder and "track ended" handler
pub struct RepeatPolicy {
    mode: RepeatMode,
    metrics: Arc<PlaybackMetrics>,
}

impl RepeatPolicy {
    pub fn new(mode: RepeatMode, metrics: Arc<PlaybackMetrics>) -> Self {
        Self { mode, metrics }
    }

    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    /// Move to the next mode (Off → Single → All → Off)
    pub fn cycle(&mut self) -> RepeatMode {
        self.mode = self.mode.cycled();
        self.metrics.record_repeat_toggle();
        info!(mode = %self.mode, "Repeat mode changed");
        self.mode
    }
}

impl TrackEndedHandler for RepeatPolicy {
    fn on_track_ended(&mut self, transport: &mut Transport) -> Result<()> {
        match self.mode {
            RepeatMode::Off => {
                transport.advance_or_stop()?;
            }
            RepeatMode::Single => match transport.current_track().cloned() {
                Some(track) => transport.play(track)?,
                None => debug!("Nothing to repeat"),
            },
            RepeatMode::All => {
                if transport.next()? == Skip::EndOfQueue && !transport.queue().is_empty() {
                    debug!("Wrapping to start of queue");
                    transport.play_at(0)?;
                }
            }
        }
        Ok(())
    }
}
