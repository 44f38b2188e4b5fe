//! Property-based tests for the queue and player
//!
//! Uses proptest to verify invariants across many random inputs.

mod common;

use common::{create_track, player_with};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tunebar_playback::{Advance, Queue, RepeatMode, ShufflePolicy, Track};

// ===== Helpers =====

fn arbitrary_ids() -> impl Strategy<Value = Vec<String>> {
    // Small alphabet so duplicates show up often
    prop::collection::vec("[a-e]{1,2}", 0..30)
}

fn queue_of(ids: &[String]) -> Queue {
    let mut queue = Queue::new();
    for id in ids {
        queue.append(Track::new(id.as_str(), id.as_str()));
    }
    queue
}

#[derive(Debug, Clone)]
enum Op {
    Next,
    Previous,
    Pause,
    Resume,
    Stop,
    Ended,
    Shuffle,
    CycleRepeat,
    Enqueue,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Next),
        Just(Op::Previous),
        Just(Op::Pause),
        Just(Op::Resume),
        Just(Op::Stop),
        Just(Op::Ended),
        Just(Op::Shuffle),
        Just(Op::CycleRepeat),
        Just(Op::Enqueue),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: n advances from unstarted visit 0..n, then the sentinel
    #[test]
    fn advance_visits_every_index(ids in arbitrary_ids()) {
        let mut queue = queue_of(&ids);

        for expected in 0..ids.len() {
            match queue.advance() {
                Advance::Moved(track) => prop_assert_eq!(&track.id, &ids[expected]),
                Advance::EndOfQueue => prop_assert!(false, "ended early at {}", expected),
            }
            prop_assert_eq!(queue.position(), Some(expected));
        }

        let before = queue.position();
        prop_assert_eq!(queue.advance(), Advance::EndOfQueue);
        prop_assert_eq!(queue.position(), before);
    }

    /// Property: shuffle is a permutation of the entries
    #[test]
    fn shuffle_preserves_multiset(ids in arbitrary_ids(), seed in any::<u64>()) {
        let queue = queue_of(&ids);
        let mut policy = ShufflePolicy::with_rng(StdRng::seed_from_u64(seed));

        let order = policy.shuffle(queue.entries());

        let mut before: Vec<String> = ids.clone();
        let mut after: Vec<String> = order.iter().map(|e| e.track().id.clone()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }

    /// Property: reorder keeps the same entry current
    #[test]
    fn reorder_keeps_current_entry(
        ids in prop::collection::vec("[a-c]", 1..20),
        pick in any::<prop::sample::Index>(),
        seed in any::<u64>(),
    ) {
        let mut queue = queue_of(&ids);
        queue.jump_to(pick.index(ids.len()));
        let current = queue.current_entry().map(|e| e.id());

        let mut policy = ShufflePolicy::with_rng(StdRng::seed_from_u64(seed));
        let order = policy.shuffle(queue.entries());
        queue.reorder(order).unwrap();

        prop_assert_eq!(queue.current_entry().map(|e| e.id()), current);
    }

    /// Property: the pointer is always None or a valid index
    #[test]
    fn pointer_always_valid(
        ids in prop::collection::vec("[a-d]", 0..8),
        ops in prop::collection::vec(arbitrary_op(), 0..60),
    ) {
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let (mut player, _) = player_with(&id_refs, RepeatMode::Off);

        for op in ops {
            match op {
                Op::Next => { player.skip_next(); }
                Op::Previous => { player.skip_previous(); }
                Op::Pause => { player.pause(); }
                Op::Resume => { player.resume(); }
                Op::Stop => player.stop(),
                Op::Ended => player.track_ended(),
                Op::Shuffle => { player.toggle_shuffle(); }
                Op::CycleRepeat => { player.cycle_repeat(); }
                Op::Enqueue => player.enqueue(create_track("x")),
            }

            let queue = player.get_queue();
            if let Some(position) = queue.position() {
                prop_assert!(position < queue.len());
            }
        }
    }

    /// Property: three repeat cycles always return to the starting mode
    #[test]
    fn repeat_cycle_has_period_three(start in 0usize..3, rounds in 1usize..5) {
        let initial = [RepeatMode::Off, RepeatMode::Single, RepeatMode::All][start];
        let (mut player, _) = player_with(&[], initial);

        for _ in 0..rounds * 3 {
            player.cycle_repeat();
        }
        prop_assert_eq!(player.get_repeat(), initial);
    }
}
