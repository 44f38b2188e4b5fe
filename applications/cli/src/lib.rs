//! Tunebar terminal front end
//!
//! Wires the suggestion pipeline and the player together behind a small
//! line-oriented interface.

pub mod config;
pub mod error;
pub mod session;
pub mod sink;

use crate::config::TunebarConfig;
use crate::error::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tunebar_suggest::{
    HttpSuggestionClient, LocalConnection, RealtimeChannel, SuggestionService, SuggestionSource,
};

/// Build the suggestion service from configuration
///
/// The HTTP backend is primary and the realtime channel secondary, unless
/// `realtime_primary` swaps them. A channel that fails its first connect
/// still goes in; it reconnects on first use.
pub async fn build_suggestion_service(
    config: &TunebarConfig,
    realtime_primary: bool,
) -> Result<(Arc<SuggestionService>, RealtimeChannel<LocalConnection>)> {
    let suggest_config = config.suggest_config();
    let http: Arc<dyn SuggestionSource> = Arc::new(HttpSuggestionClient::new(&suggest_config)?);

    let channel = RealtimeChannel::new(LocalConnection::new(), config.reconnect_policy());
    if let Err(e) = channel.connect().await {
        warn!(error = %e, "Realtime channel unavailable at startup");
    }
    let realtime: Arc<dyn SuggestionSource> = Arc::new(channel.clone());

    let (primary, secondary) = if realtime_primary {
        (realtime, http)
    } else {
        (http, realtime)
    };
    info!(
        primary = primary.name(),
        secondary = secondary.name(),
        base_url = %suggest_config.base_url,
        "Suggestion service ready"
    );

    let service = SuggestionService::new(primary, &suggest_config).with_secondary(secondary);
    Ok((Arc::new(service), channel))
}
