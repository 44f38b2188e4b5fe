//! Shuffle policy
//!
//! Produces a new order for the queue on demand. The policy never touches
//! the queue itself; the caller installs the result with
//! [`Queue::reorder`](crate::Queue::reorder).

use crate::types::QueueEntry;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use tracing::debug;

/// Shuffle on/off flag plus the randomness source
///
/// Always starts disabled; the only way on is [`toggle`](Self::toggle),
/// which is also when the queue gets shuffled.
pub struct ShufflePolicy {
    enabled: bool,
    rng: Box<dyn RngCore + Send>,
}

impl ShufflePolicy {
    /// Policy seeded from OS entropy
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Policy with a caller-provided RNG (seeded in tests)
    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            enabled: false,
            rng: Box::new(rng),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Flip the flag and return the new value
    ///
    /// Turning shuffle off does not restore the previous order.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        debug!(enabled = self.enabled, "Shuffle toggled");
        self.enabled
    }

    /// Uniformly random permutation of `snapshot` (Fisher-Yates)
    pub fn shuffle(&mut self, snapshot: &[QueueEntry]) -> Vec<QueueEntry> {
        let mut order = snapshot.to_vec();
        order.shuffle(&mut self.rng);
        order
    }
}

impl Default for ShufflePolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::Queue;
    use crate::types::Track;

    fn queue_of(count: usize) -> Queue {
        let mut queue = Queue::new();
        for i in 0..count {
            queue.append(Track::new(format!("t{}", i), format!("Track {}", i)));
        }
        queue
    }

    #[test]
    fn toggle_flips() {
        let mut policy = ShufflePolicy::with_rng(StdRng::seed_from_u64(1));
        assert!(!policy.is_enabled());
        assert!(policy.toggle());
        assert!(policy.is_enabled());
        assert!(!policy.toggle());
    }

    #[test]
    fn shuffle_is_permutation() {
        let queue = queue_of(20);
        let mut policy = ShufflePolicy::with_rng(StdRng::seed_from_u64(7));

        let order = policy.shuffle(queue.entries());

        let mut before: Vec<_> = queue.entries().iter().map(QueueEntry::id).collect();
        let mut after: Vec<_> = order.iter().map(QueueEntry::id).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn shuffle_does_not_touch_input() {
        let queue = queue_of(5);
        let snapshot = queue.snapshot();
        let mut policy = ShufflePolicy::with_rng(StdRng::seed_from_u64(3));

        let _ = policy.shuffle(&snapshot);
        assert_eq!(snapshot, queue.snapshot());
    }

    #[test]
    fn same_seed_same_order() {
        let queue = queue_of(10);
        let mut first = ShufflePolicy::with_rng(StdRng::seed_from_u64(42));
        let mut second = ShufflePolicy::with_rng(StdRng::seed_from_u64(42));

        assert_eq!(
            first.shuffle(queue.entries()),
            second.shuffle(queue.entries())
        );
    }

    #[test]
    fn shuffle_empty() {
        let mut policy = ShufflePolicy::new();
        assert!(policy.shuffle(&[]).is_empty());
    }
}
