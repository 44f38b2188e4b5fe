//! Realtime suggestion channel with bounded reconnect
//!
//! Wire events (tagged by `event`):
//!
//! ```text
//!   client -> server   {"event": "suggestion_update", "query": "...", "room": "global"}
//!   server -> client   {"event": "suggestions", "query": "...", "results": [...]}
//! ```
//!
//! Reconnect state machine:
//!
//! ```text
//!   Disconnected --connect ok--> Connected --exchange fails--> Reconnecting
//!                                    ^                              |
//!                                    +---------- attempt ok --------+
//!                                                                   |
//!                              GaveUp <--- attempts exhausted ------+
//!                                 |
//!                                 +--reinitialize--> Connected / Disconnected
//! ```
//!
//! Attempt `n` waits `n * backoff` before dialing.

use crate::error::{Result, SuggestError};
use crate::fallback::thumbnail_url;
use crate::source::SuggestionSource;
use crate::types::{validate_results, RawSuggestion, Suggestion};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Room used when the client does not name one
pub const DEFAULT_ROOM: &str = "global";

fn default_room() -> String {
    DEFAULT_ROOM.to_string()
}

/// Messages exchanged on the realtime channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChannelMessage {
    /// The search box changed
    SuggestionUpdate {
        #[serde(default)]
        query: String,
        #[serde(default = "default_room")]
        room: String,
    },

    /// Suggestions for a query
    Suggestions {
        query: String,
        #[serde(default)]
        results: Vec<RawSuggestion>,
    },
}

/// Transport underneath a [`RealtimeChannel`]
#[async_trait]
pub trait RealtimeConnection: Send + Sync + 'static {
    /// Open (or re-open) the connection
    async fn connect(&self) -> Result<()>;

    /// Send one request and wait for its response
    async fn exchange(&self, request: ChannelMessage) -> Result<ChannelMessage>;
}

/// Connection state as seen by the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connected,
    Reconnecting { attempt: u32 },
    GaveUp,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Disconnected => f.write_str("disconnected"),
            ChannelState::Connected => f.write_str("connected"),
            ChannelState::Reconnecting { attempt } => write!(f, "reconnecting (attempt {})", attempt),
            ChannelState::GaveUp => f.write_str("gave up"),
        }
    }
}

/// Bounded linear backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub backoff_step: Duration,
}

impl ReconnectPolicy {
    pub fn new(max_attempts: u32, backoff_step: Duration) -> Self {
        Self {
            max_attempts,
            backoff_step,
        }
    }

    /// Wait before attempt `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

struct ChannelInner<C> {
    connection: C,
    policy: ReconnectPolicy,
    room: String,
    state: Mutex<ChannelState>,
}

/// Suggestion source backed by a realtime connection
///
/// Cheap to clone; clones share the connection and its state.
pub struct RealtimeChannel<C> {
    inner: Arc<ChannelInner<C>>,
}

impl<C> Clone for RealtimeChannel<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: RealtimeConnection> RealtimeChannel<C> {
    pub fn new(connection: C, policy: ReconnectPolicy) -> Self {
        Self::with_room(connection, policy, DEFAULT_ROOM)
    }

    pub fn with_room(connection: C, policy: ReconnectPolicy, room: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                connection,
                policy,
                room: room.into(),
                state: Mutex::new(ChannelState::Disconnected),
            }),
        }
    }

    pub async fn state(&self) -> ChannelState {
        *self.inner.state.lock().await
    }

    pub fn connection(&self) -> &C {
        &self.inner.connection
    }

    /// Single connect attempt, no retries
    pub async fn connect(&self) -> Result<()> {
        match self.inner.connection.connect().await {
            Ok(()) => {
                self.set_state(ChannelState::Connected).await;
                info!(room = %self.inner.room, "Realtime channel connected");
                Ok(())
            }
            Err(e) => {
                self.set_state(ChannelState::Disconnected).await;
                Err(e)
            }
        }
    }

    /// Bounded reconnect loop
    ///
    /// Fails immediately if a reconnect is already running or the channel
    /// already gave up.
    pub async fn reconnect(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock().await;
            match *state {
                ChannelState::Connected => return Ok(()),
                ChannelState::GaveUp => {
                    return Err(SuggestError::GaveUp {
                        attempts: self.inner.policy.max_attempts,
                    })
                }
                ChannelState::Reconnecting { .. } => {
                    return Err(SuggestError::ChannelUnavailable(
                        "reconnect already in progress".into(),
                    ))
                }
                ChannelState::Disconnected => {
                    *state = ChannelState::Reconnecting { attempt: 1 };
                }
            }
        }

        let policy = self.inner.policy;
        for attempt in 1..=policy.max_attempts {
            self.set_state(ChannelState::Reconnecting { attempt }).await;

            let delay = policy.delay_for(attempt);
            debug!(attempt, delay_ms = delay.as_millis() as u64, "Waiting before reconnect");
            tokio::time::sleep(delay).await;

            match self.inner.connection.connect().await {
                Ok(()) => {
                    self.set_state(ChannelState::Connected).await;
                    info!(attempt, "Realtime channel reconnected");
                    return Ok(());
                }
                Err(e) => warn!(attempt, error = %e, "Reconnect attempt failed"),
            }
        }

        self.set_state(ChannelState::GaveUp).await;
        warn!(
            attempts = policy.max_attempts,
            "Giving up on realtime channel until reinitialized"
        );
        Err(SuggestError::GaveUp {
            attempts: policy.max_attempts,
        })
    }

    /// Leave `GaveUp` and try to connect again right away
    ///
    /// Refused while a reconnect loop owns the channel. The immediate
    /// attempt holds the `Reconnecting` state itself, so a failed request
    /// cannot start a loop underneath it.
    pub async fn reinitialize(&self) -> Result<()> {
        {
            let mut state = self.inner.state.lock().await;
            if let ChannelState::Reconnecting { .. } = *state {
                return Err(SuggestError::ChannelUnavailable(
                    "reconnect already in progress".into(),
                ));
            }
            *state = ChannelState::Reconnecting { attempt: 1 };
        }

        info!("Reinitializing realtime channel");
        self.connect().await
    }

    /// Exchange one request, scheduling a reconnect when the channel drops
    pub async fn request(&self, request: ChannelMessage) -> Result<ChannelMessage> {
        let state = self.state().await;
        match state {
            ChannelState::Connected => {}
            ChannelState::GaveUp => {
                return Err(SuggestError::GaveUp {
                    attempts: self.inner.policy.max_attempts,
                })
            }
            ChannelState::Disconnected => {
                self.spawn_reconnect();
                return Err(SuggestError::ChannelUnavailable(state.to_string()));
            }
            ChannelState::Reconnecting { .. } => {
                return Err(SuggestError::ChannelUnavailable(state.to_string()));
            }
        }

        match self.inner.connection.exchange(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                warn!(error = %e, "Realtime exchange failed, reconnecting");
                self.set_state(ChannelState::Disconnected).await;
                self.spawn_reconnect();
                Err(e)
            }
        }
    }

    fn spawn_reconnect(&self) {
        let channel = self.clone();
        tokio::spawn(async move {
            if let Err(e) = channel.reconnect().await {
                debug!(error = %e, "Background reconnect ended");
            }
        });
    }

    async fn set_state(&self, state: ChannelState) {
        *self.inner.state.lock().await = state;
    }
}

#[async_trait]
impl<C: RealtimeConnection> SuggestionSource for RealtimeChannel<C> {
    fn name(&self) -> &str {
        "realtime"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Suggestion>> {
        let request = ChannelMessage::SuggestionUpdate {
            query: query.to_string(),
            room: self.inner.room.clone(),
        };

        match self.request(request).await? {
            ChannelMessage::Suggestions {
                query: answered,
                results,
            } if answered == query => Ok(validate_results(results, limit)),
            other => Err(SuggestError::Protocol(format!(
                "unexpected response to '{}': {:?}",
                query, other
            ))),
        }
    }
}

// =============================================================================
// In-process connection
// =============================================================================

/// Counters kept by [`LocalConnection`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConnectionMetrics {
    pub connections: u64,
    pub disconnections: u64,
    pub events_received: u64,
}

/// In-process stand-in for the realtime server
///
/// Answers every `suggestion_update` with five generated suggestions
/// (`"<query> song N"`, ids `<first three chars>_<i>`).
#[derive(Debug, Default)]
pub struct LocalConnection {
    connected: AtomicBool,
    connections: AtomicU64,
    disconnections: AtomicU64,
    events_received: AtomicU64,
}

impl LocalConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the connection, as a server restart would
    pub fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.disconnections.fetch_add(1, Ordering::Relaxed);
            info!("Local realtime connection dropped");
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn metrics(&self) -> ConnectionMetrics {
        ConnectionMetrics {
            connections: self.connections.load(Ordering::Relaxed),
            disconnections: self.disconnections.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
        }
    }

    /// Suggestions the server generates for `query`
    pub fn generate_suggestions(query: &str) -> Vec<RawSuggestion> {
        let prefix: String = query.chars().take(3).collect();

        (0..5)
            .map(|i| {
                let video_id = format!("{}_{}", prefix, i);
                RawSuggestion {
                    title: Some(format!("{} song {}", query, i + 1)),
                    thumbnail: Some(thumbnail_url(&video_id)),
                    video_id: Some(video_id),
                }
            })
            .collect()
    }
}

#[async_trait]
impl RealtimeConnection for LocalConnection {
    async fn connect(&self) -> Result<()> {
        if !self.connected.swap(true, Ordering::SeqCst) {
            self.connections.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }

    async fn exchange(&self, request: ChannelMessage) -> Result<ChannelMessage> {
        if !self.is_connected() {
            return Err(SuggestError::Connection("not connected".into()));
        }
        self.events_received.fetch_add(1, Ordering::Relaxed);

        match request {
            ChannelMessage::SuggestionUpdate { query, room } => {
                debug!(query = %query, room = %room, "Generating suggestions");
                let results = Self::generate_suggestions(&query);
                Ok(ChannelMessage::Suggestions { query, results })
            }
            other => Err(SuggestError::Protocol(format!(
                "server does not accept {:?}",
                other
            ))),
        }
    }
}
