//! Queue navigation integration tests
//!
//! Real-world scenarios: picking a suggestion, next/previous buttons,
//! reaching the end of the queue.

mod common;

use common::{create_player, create_track, player_with};
use tunebar_playback::{Advance, Queue, RepeatMode, Retreat, TransportState};

// ===== Queue Store =====

#[test]
fn test_advance_visits_every_index_then_stops() {
    let mut queue = Queue::new();
    for id in ["a", "b", "c", "d"] {
        queue.append(create_track(id));
    }

    for expected in 0..4 {
        assert!(matches!(queue.advance(), Advance::Moved(_)));
        assert_eq!(queue.position(), Some(expected));
    }

    assert_eq!(queue.advance(), Advance::EndOfQueue);
    assert_eq!(queue.position(), Some(3));
}

#[test]
fn test_retreat_at_first_entry() {
    let mut queue = Queue::new();
    queue.append(create_track("a"));
    queue.advance();

    assert_eq!(queue.retreat(), Retreat::NoOp);
    assert_eq!(queue.position(), Some(0));
}

// ===== Player Navigation =====

#[test]
fn test_enqueue_play_and_walk_to_end() {
    let (mut player, sink) = player_with(&["A", "B", "C"], RepeatMode::Off);
    assert!(player.get_current_track().is_none());

    assert!(player.play(create_track("A")));
    assert_eq!(player.get_current_track().unwrap().id, "A");

    assert_eq!(player.skip_next().unwrap().id, "B");
    assert_eq!(player.skip_next().unwrap().id, "C");

    // End of queue: nothing new plays, pointer stays on C
    assert!(player.skip_next().is_none());
    assert_eq!(player.get_current_track().unwrap().id, "C");
    assert_eq!(player.get_queue().position(), Some(2));
    assert_eq!(player.get_state(), TransportState::Playing);

    assert_eq!(sink.loaded(), vec!["A", "B", "C"]);
}

#[test]
fn test_previous_button_walks_back() {
    let (mut player, _) = player_with(&["A", "B", "C"], RepeatMode::Off);
    player.play_at(2);

    assert_eq!(player.skip_previous().unwrap().id, "B");
    assert_eq!(player.skip_previous().unwrap().id, "A");
    assert!(player.skip_previous().is_none());
    assert_eq!(player.get_queue().position(), Some(0));
}

#[test]
fn test_play_suggestion_not_in_queue_appends() {
    let (mut player, _) = player_with(&["A", "B"], RepeatMode::Off);
    player.play_at(0);

    assert!(player.play(create_track("Z")));
    assert_eq!(player.get_queue().len(), 3);
    assert_eq!(player.get_queue().position(), Some(2));
}

#[test]
fn test_play_queued_suggestion_does_not_duplicate() {
    let (mut player, _) = player_with(&["A", "B", "C"], RepeatMode::Off);

    player.play(create_track("B"));
    player.play(create_track("B"));

    assert_eq!(player.get_queue().len(), 3);
    assert_eq!(player.get_current_track().unwrap().id, "B");
}

#[test]
fn test_duplicates_are_allowed_in_queue() {
    let (mut player, _, _) = create_player(RepeatMode::Off);
    player.enqueue(create_track("A"));
    player.enqueue(create_track("A"));

    assert_eq!(player.get_queue().len(), 2);
    player.play_at(0);
    assert_eq!(player.skip_next().unwrap().id, "A");
    assert_eq!(player.get_queue().position(), Some(1));
}

#[test]
fn test_skip_on_empty_queue() {
    let (mut player, sink, notifier) = create_player(RepeatMode::Off);

    assert!(player.skip_next().is_none());
    assert!(player.skip_previous().is_none());
    assert!(sink.loaded().is_empty());
    assert_eq!(player.get_state(), TransportState::Stopped);

    // Requests are still counted and the UI still refreshes
    let metrics = player.metrics();
    assert_eq!(metrics.skips_next, 1);
    assert_eq!(metrics.skips_previous, 1);
    assert_eq!(notifier.count(), 2);
}

#[test]
fn test_clear_then_enqueue_starts_fresh() {
    let (mut player, _) = player_with(&["A", "B"], RepeatMode::Off);
    player.play_at(1);

    player.clear_queue();
    assert_eq!(player.get_queue().position(), None);

    player.enqueue(create_track("C"));
    assert_eq!(player.skip_next().unwrap().id, "C");
}
