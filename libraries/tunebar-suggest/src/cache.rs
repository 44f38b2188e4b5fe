//! LRU cache of sanitized query → suggestions

use crate::types::Suggestion;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Bounded result cache
///
/// A capacity of zero disables caching: lookups always miss and inserts
/// are dropped.
pub struct SuggestionCache {
    entries: Option<LruCache<String, Vec<Suggestion>>>,
}

impl SuggestionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    /// Cached results for `query`, marking it most recently used
    pub fn get(&mut self, query: &str) -> Option<Vec<Suggestion>> {
        self.entries.as_mut()?.get(query).cloned()
    }

    pub fn insert(&mut self, query: String, results: Vec<Suggestion>) {
        if let Some(entries) = self.entries.as_mut() {
            entries.put(query, results);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
