//! Playback counters
//!
//! One shared record for the whole player. Components get an
//! `Arc<PlaybackMetrics>` at construction and bump their own counter;
//! readers only ever see a [`MetricsSnapshot`].

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counters for the lifetime of the process
#[derive(Debug, Default)]
pub struct PlaybackMetrics {
    plays: AtomicU64,
    pauses: AtomicU64,
    skips_next: AtomicU64,
    skips_previous: AtomicU64,
    shuffles: AtomicU64,
    repeat_toggles: AtomicU64,
}

/// Point-in-time copy of [`PlaybackMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub plays: u64,
    pub pauses: u64,
    pub skips_next: u64,
    pub skips_previous: u64,
    pub shuffles: u64,
    pub repeat_toggles: u64,
}

impl PlaybackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_play(&self) {
        self.plays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pause(&self) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip_next(&self) {
        self.skips_next.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip_previous(&self) {
        self.skips_previous.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shuffle(&self) {
        self.shuffles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_repeat_toggle(&self) {
        self.repeat_toggles.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plays: self.plays.load(Ordering::Relaxed),
            pauses: self.pauses.load(Ordering::Relaxed),
            skips_next: self.skips_next.load(Ordering::Relaxed),
            skips_previous: self.skips_previous.load(Ordering::Relaxed),
            shuffles: self.shuffles.load(Ordering::Relaxed),
            repeat_toggles: self.repeat_toggles.load(Ordering::Relaxed),
        }
    }
}
