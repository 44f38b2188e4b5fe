//! Tunebar Suggestion Client
//!
//! Everything between the search box and the suggestion list.
//!
//! # Features
//!
//! - **HTTP backend**: `GET /api/search?q=` with response validation
//! - **Realtime channel**: `suggestion_update` / `suggestions` events with
//!   bounded linear-backoff reconnect
//! - **Fallback**: static catalogue when every live source fails
//! - **Debounce**: quiet-period timer plus a generation guard against
//!   stale responses
//! - **Cache**: LRU of sanitized queries
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tunebar_suggest::{DebouncedSearch, HttpSuggestionClient, SuggestConfig, SuggestionService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SuggestConfig::new("http://127.0.0.1:5000");
//!     let client = HttpSuggestionClient::new(&config)?;
//!     let service = Arc::new(SuggestionService::new(Arc::new(client), &config));
//!
//!     let (mut search, mut results) = DebouncedSearch::new(service, config.debounce);
//!     search.input("shape of");
//!     search.input("shape of you");
//!
//!     results.changed().await?;
//!     for suggestion in &results.borrow().results {
//!         println!("{}", suggestion.title);
//!     }
//!     Ok(())
//! }
//! ```

mod cache;
mod channel;
mod debounce;
mod error;
mod fallback;
mod http;
mod query;
mod service;
mod source;
mod types;

// Re-export main types
pub use cache::SuggestionCache;
pub use channel::{
    ChannelMessage, ChannelState, ConnectionMetrics, LocalConnection, RealtimeChannel,
    RealtimeConnection, ReconnectPolicy, DEFAULT_ROOM,
};
pub use debounce::{DebouncedSearch, SuggestionBatch};
pub use error::{Result, SuggestError};
pub use fallback::{thumbnail_url, FallbackCatalogue};
pub use http::HttpSuggestionClient;
pub use query::{is_searchable, sanitize_query, MIN_QUERY_LEN};
pub use service::{ServiceMetrics, SuggestionService};
pub use source::SuggestionSource;
pub use types::{
    validate_results, RawSuggestion, SearchResponse, SuggestConfig, Suggestion,
    DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_RESULTS, UNKNOWN_TITLE,
};
