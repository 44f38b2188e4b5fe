//! Queue store
//!
//! Ordered list of tracks plus the current-position pointer:
//!
//! ```text
//!   index:    0        1        2
//!           [Track A][Track B][Track C]
//!                       ^
//!                   position = Some(1)
//! ```
//!
//! `position` is `None` until something is started and after `clear()`.
//! Otherwise it always indexes into `entries`.

use crate::error::{PlaybackError, Result};
use crate::types::{EntryId, QueueEntry, Track};
use std::collections::HashMap;
use tracing::debug;

/// Outcome of moving the pointer forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Pointer moved; this is the new current track
    Moved(Track),

    /// No next element; pointer left where it was
    EndOfQueue,
}

/// Outcome of moving the pointer backward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retreat {
    /// Pointer moved; this is the new current track
    Moved(Track),

    /// No previous element; pointer left where it was
    NoOp,
}

/// Ordered track queue with a current-position pointer
#[derive(Debug, Clone, Default)]
pub struct Queue {
    entries: Vec<QueueEntry>,

    /// Index of the current entry, `None` when unstarted
    position: Option<usize>,

    /// Next entry id to hand out (never reused, even across `clear`)
    next_entry_id: u64,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Add track to the end of the queue
    ///
    /// No de-duplication: enqueuing the same track twice yields two entries.
    pub fn append(&mut self, track: Track) -> EntryId {
        let id = EntryId(self.next_entry_id);
        self.next_entry_id += 1;
        self.entries.push(QueueEntry::new(id, track));
        id
    }

    /// Empty the queue and reset the pointer
    pub fn clear(&mut self) {
        self.entries.clear();
        self.position = None;
    }

    /// Replace contents with a permutation of the current entries
    ///
    /// The pointer follows the current *entry* to its new index, so the
    /// current track never silently changes. Anything that is not a
    /// permutation of the queued entries is rejected and leaves the queue
    /// untouched.
    pub fn reorder(&mut self, new_order: Vec<QueueEntry>) -> Result<()> {
        if new_order.len() != self.entries.len() {
            return Err(PlaybackError::NotAPermutation(format!(
                "expected {} entries, got {}",
                self.entries.len(),
                new_order.len()
            )));
        }

        let mut remaining: HashMap<EntryId, &QueueEntry> =
            self.entries.iter().map(|e| (e.id(), e)).collect();

        for entry in &new_order {
            match remaining.remove(&entry.id()) {
                Some(existing) if existing == entry => {}
                Some(_) => {
                    return Err(PlaybackError::NotAPermutation(format!(
                        "entry {} carries a different track",
                        entry.id()
                    )))
                }
                None => {
                    return Err(PlaybackError::NotAPermutation(format!(
                        "entry {} is unknown or repeated",
                        entry.id()
                    )))
                }
            }
        }

        let current = self.current_entry().map(QueueEntry::id);
        self.entries = new_order;
        self.position = current.and_then(|id| self.entries.iter().position(|e| e.id() == id));
        Ok(())
    }

    /// Track at the pointer, if any
    pub fn current(&self) -> Option<&Track> {
        self.current_entry().map(QueueEntry::track)
    }

    /// Entry at the pointer, if any
    pub fn current_entry(&self) -> Option<&QueueEntry> {
        self.position.and_then(|index| self.entries.get(index))
    }

    /// Move the pointer to the next entry
    ///
    /// From an unstarted queue this moves to index 0.
    pub fn advance(&mut self) -> Advance {
        let next = self.position.map_or(0, |index| index + 1);

        match self.entries.get(next) {
            Some(entry) => {
                self.position = Some(next);
                Advance::Moved(entry.track().clone())
            }
            None => {
                debug!(position = ?self.position, len = self.entries.len(), "Advance past end of queue");
                Advance::EndOfQueue
            }
        }
    }

    /// Move the pointer to the previous entry
    pub fn retreat(&mut self) -> Retreat {
        match self.position {
            Some(index) if index > 0 => {
                self.position = Some(index - 1);
                Retreat::Moved(self.entries[index - 1].track().clone())
            }
            _ => {
                debug!(position = ?self.position, "Retreat before start of queue");
                Retreat::NoOp
            }
        }
    }

    /// Point at the entry at `index`
    ///
    /// Returns the track now current, or `None` (pointer unchanged) if the
    /// index is out of bounds.
    pub fn jump_to(&mut self, index: usize) -> Option<Track> {
        let track = self.entries.get(index)?.track().clone();
        self.position = Some(index);
        Some(track)
    }

    /// Current pointer (`None` = unstarted)
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Restore a previously observed pointer
    ///
    /// Out-of-range values collapse to `None`.
    pub(crate) fn restore_position(&mut self, position: Option<usize>) {
        self.position = position.filter(|&index| index < self.entries.len());
    }

    /// Index of the first entry holding `track_id`
    pub fn position_of(&self, track_id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.track().id == track_id)
    }

    /// Get track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.entries.get(index).map(QueueEntry::track)
    }

    /// Copy of all entries in queue order (input for shuffling)
    pub fn snapshot(&self) -> Vec<QueueEntry> {
        self.entries.clone()
    }

    /// All entries in queue order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Iterate over tracks in queue order
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.entries.iter().map(QueueEntry::track)
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
