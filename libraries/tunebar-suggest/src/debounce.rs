//! Debounced search with a request-generation guard
//!
//! Every keystroke bumps the generation and restarts the quiet-period
//! timer. When the timer fires the query is fetched; the response is
//! published only if no newer input arrived in the meantime, so a slow
//! response to an old query can never overwrite a newer one.

use crate::service::SuggestionService;
use crate::types::Suggestion;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Results published for one input generation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionBatch {
    pub generation: u64,
    pub query: String,
    pub results: Vec<Suggestion>,
}

/// Debouncer in front of a [`SuggestionService`]
///
/// Must be used from within a tokio runtime.
pub struct DebouncedSearch {
    service: Arc<SuggestionService>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    timer: Option<JoinHandle<()>>,
    results: Arc<watch::Sender<SuggestionBatch>>,
}

impl DebouncedSearch {
    /// Create a debouncer and the receiver its results are published on
    pub fn new(
        service: Arc<SuggestionService>,
        delay: Duration,
    ) -> (Self, watch::Receiver<SuggestionBatch>) {
        let (tx, rx) = watch::channel(SuggestionBatch::default());

        let search = Self {
            service,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            timer: None,
            results: Arc::new(tx),
        };
        (search, rx)
    }

    /// Another receiver for published batches
    pub fn subscribe(&self) -> watch::Receiver<SuggestionBatch> {
        self.results.subscribe()
    }

    /// Generation of the most recent input
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Register new search-box contents
    ///
    /// Cancels the pending timer and returns the generation assigned to
    /// this input.
    pub fn input(&mut self, query: impl Into<String>) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.cancel_timer();

        let query = query.into();
        let delay = self.delay;
        let latest = Arc::clone(&self.generation);
        let service = Arc::clone(&self.service);
        let results = Arc::clone(&self.results);

        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }

            // Detached: newer input cancels the timer above, never a request
            // already on the wire. The guard below handles those.
            tokio::spawn(async move {
                let fetched = service.fetch(&query).await;

                if latest.load(Ordering::SeqCst) != generation {
                    debug!(
                        generation,
                        latest = latest.load(Ordering::SeqCst),
                        query = %query,
                        "Dropping stale suggestions"
                    );
                    return;
                }

                debug!(generation, query = %query, count = fetched.len(), "Publishing suggestions");
                results.send_replace(SuggestionBatch {
                    generation,
                    query,
                    results: fetched,
                });
            });
        }));

        generation
    }

    /// Invalidate everything in flight (e.g. the search box was cleared)
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_timer();
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
