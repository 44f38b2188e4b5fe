//! Skip controller

use crate::{
    error::Result,
    events::UiNotifier,
    metrics::PlaybackMetrics,
    transport::{Skip, Transport},
};
use std::sync::Arc;

/// Forwards skip requests to the transport
///
/// Counters count *requests*: a skip that hits a queue boundary is still
/// recorded, and the UI is asked to refresh either way.
pub struct SkipController {
    metrics: Arc<PlaybackMetrics>,
    notifier: Arc<dyn UiNotifier>,
}

impl SkipController {
    pub fn new(metrics: Arc<PlaybackMetrics>, notifier: Arc<dyn UiNotifier>) -> Self {
        Self { metrics, notifier }
    }

    pub fn skip_next(&self, transport: &mut Transport) -> Result<Skip> {
        self.metrics.record_skip_next();
        let result = transport.next();
        self.notifier.request_refresh();
        result
    }

    pub fn skip_previous(&self, transport: &mut Transport) -> Result<Skip> {
        self.metrics.record_skip_previous();
        let result = transport.previous();
        self.notifier.request_refresh();
        result
    }
}
