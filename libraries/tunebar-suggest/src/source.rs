//! Suggestion source abstraction
//!
//! HTTP backend, realtime channel and the static fallback catalogue all
//! answer the same question; the service chains them.

use crate::error::Result;
use crate::types::Suggestion;
use async_trait::async_trait;

/// Anything that can answer a search query
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &str;

    /// Search for `query` (already sanitized), returning at most `limit` hits
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>>;
}
