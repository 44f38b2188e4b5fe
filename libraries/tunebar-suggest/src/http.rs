//! HTTP search backend client.

use crate::error::{Result, SuggestError};
use crate::source::SuggestionSource;
use crate::types::{validate_results, SearchResponse, Suggestion, SuggestConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for `GET /api/search?q=<query>`.
///
/// # Example
///
/// ```ignore
/// use tunebar_suggest::{HttpSuggestionClient, SuggestConfig, SuggestionSource};
///
/// let client = HttpSuggestionClient::new(&SuggestConfig::new("http://127.0.0.1:5000"))?;
/// let hits = client.search("blinding lights", 7).await?;
/// for hit in hits {
///     println!("{} ({})", hit.title, hit.video_id);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpSuggestionClient {
    http: Client,
    search_url: Url,
}

impl HttpSuggestionClient {
    /// Create a new client for the configured backend.
    pub fn new(config: &SuggestConfig) -> Result<Self> {
        Self::with_timeout(&config.base_url, config.request_timeout)
    }

    /// Create a client with an explicit request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        if base_url.is_empty() {
            return Err(SuggestError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = base_url.trim_end_matches('/');
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(SuggestError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let search_url = Url::parse(&format!("{}/api/search", base))
            .map_err(|e| SuggestError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(format!("Tunebar/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, search_url })
    }

    /// Full search endpoint (without query string).
    pub fn search_url(&self) -> &str {
        self.search_url.as_str()
    }
}

#[async_trait]
impl SuggestionSource for HttpSuggestionClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair("q", query);

        debug!(url = %url, "Searching suggestions");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            let body: SearchResponse = response.json().await.map_err(|e| {
                SuggestError::ParseError(format!("Failed to parse search response: {}", e))
            })?;

            let received = body.results.len();
            let results = validate_results(body.results, limit);
            debug!(
                query = %query,
                received,
                kept = results.len(),
                "Fetched suggestions"
            );

            Ok(results)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(SuggestError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
