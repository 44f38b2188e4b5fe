//! Suggestion fetch pipeline
//!
//! ```text
//!   sanitize ─> cache ─> primary ──fail──> secondary (once) ──fail──> fallback catalogue
//! ```
//!
//! `fetch` never fails: every error is logged and the next stage answers.

use crate::cache::SuggestionCache;
use crate::fallback::FallbackCatalogue;
use crate::query::{is_searchable, sanitize_query};
use crate::source::SuggestionSource;
use crate::types::{Suggestion, SuggestConfig};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Counters of the fetch pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ServiceMetrics {
    /// Queries that went past the cache to a live source
    pub requests: u64,
    pub cache_hits: u64,
    pub primary_failures: u64,
    /// Queries answered from the fallback catalogue
    pub fallbacks: u64,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    cache_hits: AtomicU64,
    primary_failures: AtomicU64,
    fallbacks: AtomicU64,
}

/// Search front-end shared by the debouncer and the CLI
pub struct SuggestionService {
    primary: Arc<dyn SuggestionSource>,
    secondary: Option<Arc<dyn SuggestionSource>>,
    fallback: FallbackCatalogue,
    cache: Mutex<SuggestionCache>,
    max_results: usize,
    counters: Counters,
}

impl SuggestionService {
    pub fn new(primary: Arc<dyn SuggestionSource>, config: &SuggestConfig) -> Self {
        Self {
            primary,
            secondary: None,
            fallback: FallbackCatalogue::new(),
            cache: Mutex::new(SuggestionCache::new(config.cache_capacity)),
            max_results: config.max_results,
            counters: Counters::default(),
        }
    }

    /// Source tried once after the primary fails
    pub fn with_secondary(mut self, secondary: Arc<dyn SuggestionSource>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Suggestions for a raw (unsanitized) query
    ///
    /// Queries shorter than two characters after sanitizing return an
    /// empty list without touching any source.
    pub async fn fetch(&self, raw_query: &str) -> Vec<Suggestion> {
        let query = sanitize_query(raw_query);
        if !is_searchable(&query) {
            debug!(query = %query, "Query too short, returning empty list");
            return Vec::new();
        }

        if let Some(hit) = self.cache.lock().await.get(&query) {
            self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
            debug!(query = %query, "Cache hit");
            return hit;
        }

        self.counters.requests.fetch_add(1, Ordering::Relaxed);

        match self.search_live(&query).await {
            Some(results) => {
                self.cache.lock().await.insert(query, results.clone());
                results
            }
            None => {
                self.counters.fallbacks.fetch_add(1, Ordering::Relaxed);
                info!(query = %query, "Serving fallback catalogue");
                self.fallback.sample(self.max_results)
            }
        }
    }

    /// Counter snapshot
    pub fn metrics(&self) -> ServiceMetrics {
        ServiceMetrics {
            requests: self.counters.requests.load(Ordering::Relaxed),
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            primary_failures: self.counters.primary_failures.load(Ordering::Relaxed),
            fallbacks: self.counters.fallbacks.load(Ordering::Relaxed),
        }
    }

    async fn search_live(&self, query: &str) -> Option<Vec<Suggestion>> {
        match self.primary.search(query, self.max_results).await {
            Ok(results) => return Some(results),
            Err(e) => {
                self.counters.primary_failures.fetch_add(1, Ordering::Relaxed);
                warn!(source = self.primary.name(), error = %e, "Primary source failed");
            }
        }

        let secondary = self.secondary.as_ref()?;
        match secondary.search(query, self.max_results).await {
            Ok(results) => Some(results),
            Err(e) => {
                warn!(source = secondary.name(), error = %e, "Secondary source failed");
                None
            }
        }
    }
}
