//! Player - composition root for the playback core
//!
//! Owns the transport and the policies around it, and is the single call
//! boundary a UI binding talks to. Nothing below this layer swallows
//! errors; nothing at this layer propagates them. A failed operation is
//! logged, reported as a [`PlayerEvent::Error`], and behaves as a no-op.

use crate::{
    error::Result,
    events::{PlayerEvent, UiNotifier},
    metrics::{MetricsSnapshot, PlaybackMetrics},
    queue::Queue,
    repeat::RepeatPolicy,
    shuffle::ShufflePolicy,
    sink::{AudioSink, StreamResolver},
    skip::SkipController,
    transport::{Skip, Transport},
    types::{PlayerConfig, RepeatMode, Track, TransportState},
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main player
pub struct Player {
    transport: Transport,
    repeat: RepeatPolicy,
    shuffle: ShufflePolicy,
    skip: SkipController,
    metrics: Arc<PlaybackMetrics>,
}

impl Player {
    /// Create a new player
    ///
    /// All collaborators are injected; the player creates the shared
    /// metrics record and hands it to every component.
    pub fn new(
        config: PlayerConfig,
        sink: Box<dyn AudioSink>,
        resolver: Box<dyn StreamResolver>,
        notifier: Arc<dyn UiNotifier>,
    ) -> Self {
        let shuffle = ShufflePolicy::new();
        Self::with_shuffle_policy(config, sink, resolver, notifier, shuffle)
    }

    /// Create a player with a specific shuffle policy (seeded RNG in tests)
    pub fn with_shuffle_policy(
        config: PlayerConfig,
        sink: Box<dyn AudioSink>,
        resolver: Box<dyn StreamResolver>,
        notifier: Arc<dyn UiNotifier>,
        shuffle: ShufflePolicy,
    ) -> Self {
        let metrics = Arc::new(PlaybackMetrics::new());

        Self {
            transport: Transport::new(sink, resolver, Arc::clone(&metrics)),
            repeat: RepeatPolicy::new(config.repeat, Arc::clone(&metrics)),
            shuffle,
            skip: SkipController::new(Arc::clone(&metrics), notifier),
            metrics,
        }
    }

    // ===== Playback Control =====

    /// Play a track, enqueuing it if it is not queued yet
    ///
    /// Returns whether playback started.
    pub fn play(&mut self, track: Track) -> bool {
        let result = self.transport.play(track);
        self.absorb("play", result).is_some()
    }

    /// Play the queue entry at `index`
    pub fn play_at(&mut self, index: usize) -> Option<Track> {
        let result = self.transport.play_at(index);
        self.absorb("play_at", result)
    }

    /// Pause while playing, resume while paused, start the queue while stopped
    pub fn toggle_play_pause(&mut self) -> TransportState {
        match self.transport.state() {
            TransportState::Playing => {
                self.pause();
            }
            TransportState::Paused => {
                self.resume();
            }
            TransportState::Stopped => self.start_from_stopped(),
        }
        self.transport.state()
    }

    /// Pause playback (no-op unless playing)
    pub fn pause(&mut self) -> bool {
        let result = self.transport.pause();
        self.absorb("pause", result).unwrap_or(false)
    }

    /// Resume playback (no-op unless paused)
    pub fn resume(&mut self) -> bool {
        let result = self.transport.resume();
        self.absorb("resume", result).unwrap_or(false)
    }

    /// Stop playback and rewind
    pub fn stop(&mut self) {
        let result = self.transport.stop();
        self.absorb("stop", result);
    }

    /// Skip to next track
    ///
    /// Returns the track that started playing, `None` at the end of the
    /// queue or on failure.
    pub fn skip_next(&mut self) -> Option<Track> {
        let result = self.skip.skip_next(&mut self.transport);
        self.absorb("skip_next", result).and_then(Self::played)
    }

    /// Go to previous track
    pub fn skip_previous(&mut self) -> Option<Track> {
        let result = self.skip.skip_previous(&mut self.transport);
        self.absorb("skip_previous", result).and_then(Self::played)
    }

    /// Deliver the "track ended" signal to the repeat policy
    pub fn track_ended(&mut self) {
        let result = self.transport.finish_track(Some(&mut self.repeat));
        self.absorb("track_ended", result);
    }

    /// Poll the sink and handle a finished track
    ///
    /// Hosts that cannot push the ended signal call this periodically.
    /// Returns whether a track ended.
    pub fn tick(&mut self) -> bool {
        if !self.transport.has_ended() {
            return false;
        }
        self.track_ended();
        true
    }

    // ===== Queue Management =====

    /// Add track to the end of the queue
    pub fn enqueue(&mut self, track: Track) {
        self.transport.enqueue(track);
    }

    /// Add several tracks in order
    pub fn enqueue_all(&mut self, tracks: impl IntoIterator<Item = Track>) {
        for track in tracks {
            self.transport.enqueue(track);
        }
    }

    /// Stop playback and empty the queue
    pub fn clear_queue(&mut self) {
        let result = self.transport.clear_queue();
        self.absorb("clear_queue", result);
    }

    // ===== Shuffle & Repeat =====

    /// Cycle repeat mode Off → Single → All → Off
    pub fn cycle_repeat(&mut self) -> RepeatMode {
        let mode = self.repeat.cycle();
        self.transport.emit(PlayerEvent::RepeatChanged { mode });
        mode
    }

    /// Toggle shuffle; turning it on reorders the queue once
    pub fn toggle_shuffle(&mut self) -> bool {
        let enabled = self.shuffle.toggle();

        if enabled {
            let order = self.shuffle.shuffle(self.transport.queue().entries());
            let result = self.transport.reorder_queue(order);
            if self.absorb("shuffle", result).is_some() {
                self.metrics.record_shuffle();
                info!(length = self.transport.queue().len(), "Queue shuffled");
            }
        }

        self.transport.emit(PlayerEvent::ShuffleChanged { enabled });
        enabled
    }

    // ===== State Queries =====

    pub fn get_state(&self) -> TransportState {
        self.transport.state()
    }

    pub fn get_current_track(&self) -> Option<&Track> {
        self.transport.current_track()
    }

    pub fn get_queue(&self) -> &Queue {
        self.transport.queue()
    }

    pub fn get_repeat(&self) -> RepeatMode {
        self.repeat.mode()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle.is_enabled()
    }

    /// Counter snapshot (the single metrics query)
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.transport.drain_events()
    }

    // ===== Internal =====

    fn start_from_stopped(&mut self) {
        match self.transport.current_track().cloned() {
            Some(track) => {
                self.play(track);
            }
            None if !self.transport.queue().is_empty() => {
                self.play_at(0);
            }
            None => debug!("Nothing to play"),
        }
    }

    fn played(skip: Skip) -> Option<Track> {
        match skip {
            Skip::Played(track) => Some(track),
            Skip::EndOfQueue | Skip::StartOfQueue => None,
        }
    }

    /// Log a failure and turn it into a no-op
    fn absorb<T>(&mut self, operation: &str, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(operation, error = %e, "Playback operation failed");
                self.transport.emit(PlayerEvent::Error {
                    message: e.to_string(),
                });
                None
            }
        }
    }
}
