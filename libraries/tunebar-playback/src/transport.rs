//! Transport - sole owner of the audio sink
//!
//! State machine:
//!
//! ```text
//!   Stopped --play--> Playing --pause--> Paused
//!      ^                 ^                  |
//!      |                 +-----resume-------+
//!      +------stop------ (any state)
//! ```
//!
//! `next`/`previous` are accepted from any state and always end in
//! `Playing` when the queue yields a track. At a queue boundary nothing
//! changes: the sink keeps doing whatever it was doing.

use crate::{
    error::{PlaybackError, Result},
    events::PlayerEvent,
    metrics::PlaybackMetrics,
    queue::{Advance, Queue, Retreat},
    sink::{AudioSink, StreamResolver},
    types::{QueueEntry, Track, TransportState},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Outcome of a skip request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Skip {
    /// The queue yielded this track and it is now playing
    Played(Track),

    /// Nothing after the current track
    EndOfQueue,

    /// Nothing before the current track
    StartOfQueue,
}

impl Skip {
    /// Track that started playing, if any
    pub fn track(&self) -> Option<&Track> {
        match self {
            Skip::Played(track) => Some(track),
            Skip::EndOfQueue | Skip::StartOfQueue => None,
        }
    }
}

/// Subscriber to the sink's "track ended" signal
///
/// Exactly one handler receives each signal; see
/// [`Transport::finish_track`].
pub trait TrackEndedHandler {
    fn on_track_ended(&mut self, transport: &mut Transport) -> Result<()>;
}

/// Owner of the playback resource and its play/pause/stop state
pub struct Transport {
    state: TransportState,
    queue: Queue,
    sink: Box<dyn AudioSink>,
    resolver: Box<dyn StreamResolver>,
    metrics: Arc<PlaybackMetrics>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl Transport {
    pub fn new(
        sink: Box<dyn AudioSink>,
        resolver: Box<dyn StreamResolver>,
        metrics: Arc<PlaybackMetrics>,
    ) -> Self {
        Self {
            state: TransportState::Stopped,
            queue: Queue::new(),
            sink,
            resolver,
            metrics,
            pending_events: Vec::new(),
        }
    }

    // ===== Playback Control =====

    /// Load `track` into the sink and start it
    ///
    /// The track is enqueued unless an entry with the same id is already
    /// queued, in which case the pointer moves to that entry (the current
    /// one if it matches). Nothing changes if resolving or loading fails.
    pub fn play(&mut self, track: Track) -> Result<()> {
        let previous = self.current_track_id();
        self.load_and_start(&track)?;

        if self.point_at(&track) {
            self.emit_queue_changed();
        }
        self.enter_playing(&track, previous);
        Ok(())
    }

    /// Pause playback
    ///
    /// Only valid while playing. Returns whether anything changed.
    pub fn pause(&mut self) -> Result<bool> {
        if self.state != TransportState::Playing {
            debug!(state = ?self.state, "Pause ignored");
            return Ok(false);
        }

        self.sink.pause()?;
        self.metrics.record_pause();
        self.set_state(TransportState::Paused);
        Ok(true)
    }

    /// Resume playback
    ///
    /// Only valid while paused. Returns whether anything changed.
    pub fn resume(&mut self) -> Result<bool> {
        if self.state != TransportState::Paused {
            debug!(state = ?self.state, "Resume ignored");
            return Ok(false);
        }

        self.sink.resume()?;
        self.set_state(TransportState::Playing);
        Ok(true)
    }

    /// Stop playback and rewind
    ///
    /// Ends in `Stopped` regardless of prior state, even if the sink
    /// reports an error. The queue pointer is kept.
    pub fn stop(&mut self) -> Result<()> {
        let result = self.sink.stop();
        self.set_state(TransportState::Stopped);
        result
    }

    /// Skip to next track
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<Skip> {
        let previous_position = self.queue.position();

        match self.queue.advance() {
            Advance::Moved(track) => self.start_moved(track, previous_position),
            Advance::EndOfQueue => {
                info!("End of queue");
                Ok(Skip::EndOfQueue)
            }
        }
    }

    /// Go to previous track
    pub fn previous(&mut self) -> Result<Skip> {
        let previous_position = self.queue.position();

        match self.queue.retreat() {
            Retreat::Moved(track) => self.start_moved(track, previous_position),
            Retreat::NoOp => {
                info!("Start of queue");
                Ok(Skip::StartOfQueue)
            }
        }
    }

    /// Point at the entry at `index` and play it
    pub fn play_at(&mut self, index: usize) -> Result<Track> {
        let previous_position = self.queue.position();
        let track = self
            .queue
            .jump_to(index)
            .ok_or(PlaybackError::IndexOutOfBounds(index))?;

        self.start_moved(track.clone(), previous_position)?;
        Ok(track)
    }

    /// Deliver the sink's "track ended" signal
    ///
    /// `handler` is the single subscriber (normally the repeat policy).
    /// Without one, the transport advances, stopping once the queue is
    /// exhausted.
    pub fn finish_track(&mut self, handler: Option<&mut dyn TrackEndedHandler>) -> Result<()> {
        if let Some(track_id) = self.current_track_id() {
            debug!(track_id = %track_id, "Track finished");
            self.pending_events
                .push(PlayerEvent::TrackFinished { track_id });
        }

        match handler {
            Some(handler) => handler.on_track_ended(self),
            None => self.advance_or_stop().map(|_| ()),
        }
    }

    /// Advance after a natural end; stop when there is nothing left
    ///
    /// A manual `next()` at the end of the queue leaves the last track
    /// playing. After a natural end the sink is idle, so the transport
    /// reports `Stopped` instead of a `Playing` state with no sound.
    pub fn advance_or_stop(&mut self) -> Result<Skip> {
        let skip = self.next()?;
        if skip == Skip::EndOfQueue {
            info!("Queue finished, stopping");
            self.stop()?;
        }
        Ok(skip)
    }

    /// Check whether the sink reported the end of the playing track
    pub fn has_ended(&self) -> bool {
        self.state == TransportState::Playing && self.sink.has_ended()
    }

    // ===== Queue Management =====

    /// Add track to the end of the queue
    pub fn enqueue(&mut self, track: Track) {
        debug!(track_id = %track.id, "Enqueued track");
        self.queue.append(track);
        self.emit_queue_changed();
    }

    /// Install a new order for the queue (see [`Queue::reorder`])
    pub fn reorder_queue(&mut self, new_order: Vec<QueueEntry>) -> Result<()> {
        self.queue.reorder(new_order)?;
        self.emit_queue_changed();
        Ok(())
    }

    /// Clear the queue
    ///
    /// Stops first: with nothing queued there is no current track to play.
    pub fn clear_queue(&mut self) -> Result<()> {
        let stopped = if self.state == TransportState::Stopped {
            Ok(())
        } else {
            self.stop()
        };

        self.queue.clear();
        self.emit_queue_changed();
        stopped
    }

    // ===== Getters =====

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn metrics(&self) -> &Arc<PlaybackMetrics> {
        &self.metrics
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    pub(crate) fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    // ===== Internal =====

    fn current_track_id(&self) -> Option<String> {
        self.queue.current().map(|t| t.id.clone())
    }

    fn load_and_start(&mut self, track: &Track) -> Result<()> {
        let locator = self.resolver.resolve(track)?;
        self.sink.load(&locator)?;
        self.sink.start()
    }

    /// Start the track the queue pointer just moved to
    ///
    /// Puts the pointer back if the sink refuses the track.
    fn start_moved(&mut self, track: Track, previous_position: Option<usize>) -> Result<Skip> {
        let previous = previous_position
            .and_then(|index| self.queue.get(index))
            .map(|t| t.id.clone());

        if let Err(e) = self.load_and_start(&track) {
            self.queue.restore_position(previous_position);
            return Err(e);
        }

        self.enter_playing(&track, previous);
        Ok(Skip::Played(track))
    }

    /// Move the pointer to `track`, enqueuing it if needed
    ///
    /// Returns true if the track was appended.
    fn point_at(&mut self, track: &Track) -> bool {
        if self.queue.current().is_some_and(|c| c.id == track.id) {
            return false;
        }

        if let Some(index) = self.queue.position_of(&track.id) {
            self.queue.jump_to(index);
            return false;
        }

        self.queue.append(track.clone());
        self.queue.jump_to(self.queue.len() - 1);
        true
    }

    fn enter_playing(&mut self, track: &Track, previous_track_id: Option<String>) {
        self.metrics.record_play();
        info!(track_id = %track.id, title = %track.title, "Playing track");

        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });
        self.set_state(TransportState::Playing);
    }

    fn set_state(&mut self, state: TransportState) {
        if self.state != state {
            self.state = state;
            self.pending_events.push(PlayerEvent::StateChanged { state });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::test_sink::{IdResolver, RecordingSink, SinkCall};

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("Track {}", id))
    }

    fn transport() -> (Transport, RecordingSink) {
        let sink = RecordingSink::default();
        let transport = Transport::new(
            Box::new(sink.clone()),
            Box::new(IdResolver),
            Arc::new(PlaybackMetrics::new()),
        );
        (transport, sink)
    }

    fn transport_with(ids: &[&str]) -> (Transport, RecordingSink) {
        let (mut transport, sink) = transport();
        for id in ids {
            transport.enqueue(create_test_track(id));
        }
        transport.drain_events();
        (transport, sink)
    }

    #[test]
    fn starts_stopped() {
        let (transport, _) = transport();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert!(transport.current_track().is_none());
    }

    #[test]
    fn play_enqueues_unknown_track() {
        let (mut transport, sink) = transport();

        transport.play(create_test_track("a")).unwrap();

        assert_eq!(transport.state(), TransportState::Playing);
        assert_eq!(transport.queue().len(), 1);
        assert_eq!(transport.current_track().unwrap().id, "a");
        assert_eq!(sink.calls(), vec![SinkCall::Load("a".into()), SinkCall::Start]);
    }

    #[test]
    fn play_queued_track_moves_pointer_without_duplicating() {
        let (mut transport, _) = transport_with(&["a", "b", "c"]);

        transport.play(create_test_track("b")).unwrap();

        assert_eq!(transport.queue().len(), 3);
        assert_eq!(transport.queue().position(), Some(1));
    }

    #[test]
    fn play_prefers_current_entry_for_duplicates() {
        let (mut transport, _) = transport_with(&["a", "b", "a"]);
        transport.play_at(2).unwrap();

        transport.play(create_test_track("a")).unwrap();
        assert_eq!(transport.queue().position(), Some(2));
    }

    #[test]
    fn play_failure_changes_nothing() {
        let (mut transport, sink) = transport();
        *sink.fail_load.lock().unwrap() = true;

        assert!(transport.play(create_test_track("a")).is_err());
        assert_eq!(transport.state(), TransportState::Stopped);
        assert!(transport.queue().is_empty());
        assert_eq!(transport.metrics().snapshot().plays, 0);
    }

    #[test]
    fn pause_resume_cycle() {
        let (mut transport, sink) = transport();
        transport.play(create_test_track("a")).unwrap();

        assert!(transport.pause().unwrap());
        assert_eq!(transport.state(), TransportState::Paused);

        assert!(transport.resume().unwrap());
        assert_eq!(transport.state(), TransportState::Playing);

        let calls = sink.calls();
        assert_eq!(calls[2..], [SinkCall::Pause, SinkCall::Resume]);
    }

    #[test]
    fn pause_twice_is_noop() {
        let (mut transport, sink) = transport();
        transport.play(create_test_track("a")).unwrap();

        transport.pause().unwrap();
        assert!(!transport.pause().unwrap());
        assert_eq!(transport.state(), TransportState::Paused);
        assert_eq!(transport.metrics().snapshot().pauses, 1);
        assert_eq!(
            sink.calls().iter().filter(|c| **c == SinkCall::Pause).count(),
            1
        );
    }

    #[test]
    fn pause_when_stopped_is_noop() {
        let (mut transport, sink) = transport();
        assert!(!transport.pause().unwrap());
        assert_eq!(transport.state(), TransportState::Stopped);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn resume_only_from_paused() {
        let (mut transport, _) = transport();
        assert!(!transport.resume().unwrap());

        transport.play(create_test_track("a")).unwrap();
        assert!(!transport.resume().unwrap());
        assert_eq!(transport.state(), TransportState::Playing);
    }

    #[test]
    fn stop_from_any_state() {
        let (mut transport, sink) = transport();

        transport.stop().unwrap();
        assert_eq!(transport.state(), TransportState::Stopped);

        transport.play(create_test_track("a")).unwrap();
        transport.pause().unwrap();
        transport.stop().unwrap();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert_eq!(transport.queue().position(), Some(0));
        assert_eq!(sink.calls().last(), Some(&SinkCall::Stop));
    }

    #[test]
    fn next_walks_queue_then_reports_end() {
        let (mut transport, _) = transport_with(&["a", "b", "c"]);
        transport.play(create_test_track("a")).unwrap();

        assert_eq!(transport.next().unwrap(), Skip::Played(create_test_track("b")));
        assert_eq!(transport.next().unwrap(), Skip::Played(create_test_track("c")));
        assert_eq!(transport.next().unwrap(), Skip::EndOfQueue);

        assert_eq!(transport.queue().position(), Some(2));
        assert_eq!(transport.state(), TransportState::Playing);
    }

    #[test]
    fn skip_from_paused_resumes_playing() {
        let (mut transport, _) = transport_with(&["a", "b"]);
        transport.play(create_test_track("a")).unwrap();
        transport.pause().unwrap();

        transport.next().unwrap();
        assert_eq!(transport.state(), TransportState::Playing);
    }

    #[test]
    fn next_at_end_keeps_paused_state() {
        let (mut transport, _) = transport_with(&["a"]);
        transport.play(create_test_track("a")).unwrap();
        transport.pause().unwrap();

        assert_eq!(transport.next().unwrap(), Skip::EndOfQueue);
        assert_eq!(transport.state(), TransportState::Paused);
    }

    #[test]
    fn next_from_stopped_unstarted_plays_first() {
        let (mut transport, sink) = transport_with(&["a", "b"]);

        assert_eq!(transport.next().unwrap(), Skip::Played(create_test_track("a")));
        assert_eq!(sink.loaded(), vec!["a"]);
    }

    #[test]
    fn previous_at_start_is_noop() {
        let (mut transport, sink) = transport_with(&["a", "b"]);
        transport.play(create_test_track("a")).unwrap();

        assert_eq!(transport.previous().unwrap(), Skip::StartOfQueue);
        assert_eq!(transport.queue().position(), Some(0));
        assert_eq!(sink.loaded(), vec!["a"]);
    }

    #[test]
    fn previous_plays_earlier_track() {
        let (mut transport, _) = transport_with(&["a", "b"]);
        transport.play_at(1).unwrap();

        assert_eq!(
            transport.previous().unwrap(),
            Skip::Played(create_test_track("a"))
        );
    }

    #[test]
    fn failed_skip_restores_pointer() {
        let (mut transport, sink) = transport_with(&["a", "b"]);
        transport.play(create_test_track("a")).unwrap();
        *sink.fail_load.lock().unwrap() = true;

        assert!(transport.next().is_err());
        assert_eq!(transport.queue().position(), Some(0));
    }

    #[test]
    fn play_at_out_of_bounds() {
        let (mut transport, _) = transport_with(&["a"]);
        assert!(matches!(
            transport.play_at(3),
            Err(PlaybackError::IndexOutOfBounds(3))
        ));
    }

    #[test]
    fn finish_without_handler_advances() {
        let (mut transport, _) = transport_with(&["a", "b"]);
        transport.play(create_test_track("a")).unwrap();

        transport.finish_track(None).unwrap();
        assert_eq!(transport.current_track().unwrap().id, "b");
        assert_eq!(transport.state(), TransportState::Playing);
    }

    #[test]
    fn finish_last_track_without_handler_stops() {
        let (mut transport, _) = transport_with(&["a"]);
        transport.play(create_test_track("a")).unwrap();

        transport.finish_track(None).unwrap();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert_eq!(transport.queue().position(), Some(0));
    }

    #[test]
    fn finish_goes_to_the_one_handler() {
        struct Counting(usize);
        impl TrackEndedHandler for Counting {
            fn on_track_ended(&mut self, _transport: &mut Transport) -> Result<()> {
                self.0 += 1;
                Ok(())
            }
        }

        let (mut transport, _) = transport_with(&["a", "b"]);
        transport.play(create_test_track("a")).unwrap();

        let mut handler = Counting(0);
        transport.finish_track(Some(&mut handler)).unwrap();

        assert_eq!(handler.0, 1);
        // Handler did nothing, so the transport did not advance on its own
        assert_eq!(transport.current_track().unwrap().id, "a");
    }

    #[test]
    fn has_ended_requires_playing() {
        let (mut transport, sink) = transport_with(&["a"]);
        sink.set_ended(true);
        assert!(!transport.has_ended());

        transport.play(create_test_track("a")).unwrap();
        sink.set_ended(true);
        assert!(transport.has_ended());
    }

    #[test]
    fn clear_queue_stops_playback() {
        let (mut transport, _) = transport_with(&["a", "b"]);
        transport.play(create_test_track("a")).unwrap();

        transport.clear_queue().unwrap();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert!(transport.current_track().is_none());
    }

    #[test]
    fn events_track_transitions() {
        let (mut transport, _) = transport_with(&["a", "b"]);
        transport.play(create_test_track("a")).unwrap();
        transport.next().unwrap();

        let events = transport.drain_events();
        assert_eq!(
            events,
            vec![
                PlayerEvent::TrackChanged {
                    track_id: "a".into(),
                    previous_track_id: None
                },
                PlayerEvent::StateChanged {
                    state: TransportState::Playing
                },
                PlayerEvent::TrackChanged {
                    track_id: "b".into(),
                    previous_track_id: Some("a".into())
                },
            ]
        );
        assert!(!transport.has_pending_events());
    }
}
