/// Simulated audio output
///
/// "Plays" each locator for a fixed duration without producing sound, so
/// the whole widget can be exercised from a terminal.
use tokio::time::{Duration, Instant};
use tracing::{debug, info};
use tunebar_playback::{AudioSink, PlaybackError, Result};

pub struct SimulatedSink {
    duration: Duration,
    loaded: Option<String>,
    /// Set while sound would be coming out
    started_at: Option<Instant>,
    /// Playback time accumulated before the last pause
    played: Duration,
}

impl SimulatedSink {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            loaded: None,
            started_at: None,
            played: Duration::ZERO,
        }
    }

    /// Current playback position
    pub fn position(&self) -> Duration {
        self.played + self.started_at.map_or(Duration::ZERO, |start| start.elapsed())
    }

    pub fn loaded(&self) -> Option<&str> {
        self.loaded.as_deref()
    }
}

impl AudioSink for SimulatedSink {
    fn load(&mut self, locator: &str) -> Result<()> {
        if locator.is_empty() {
            return Err(PlaybackError::Sink("empty locator".to_string()));
        }
        debug!(locator = %locator, "Loading stream");
        self.loaded = Some(locator.to_string());
        self.started_at = None;
        self.played = Duration::ZERO;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        let locator = self.loaded.as_deref().ok_or(PlaybackError::NoTrackLoaded)?;
        info!(locator = %locator, "Streaming");
        self.played = Duration::ZERO;
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(start) = self.started_at.take() {
            self.played += start.elapsed();
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if self.loaded.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.started_at = None;
        self.played = Duration::ZERO;
        Ok(())
    }

    fn has_ended(&self) -> bool {
        self.loaded.is_some() && self.position() >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ends_after_duration() {
        let mut sink = SimulatedSink::new(Duration::from_secs(5));
        sink.load("https://example/a").unwrap();
        sink.start().unwrap();

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!sink.has_ended());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(sink.has_ended());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_position() {
        let mut sink = SimulatedSink::new(Duration::from_secs(5));
        sink.load("a").unwrap();
        sink.start().unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        sink.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(sink.position(), Duration::from_secs(3));
        assert!(!sink.has_ended());

        sink.resume().unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(sink.has_ended());
    }

    #[tokio::test(start_paused = true)]
    async fn stop_rewinds() {
        let mut sink = SimulatedSink::new(Duration::from_secs(5));
        sink.load("a").unwrap();
        sink.start().unwrap();
        tokio::time::sleep(Duration::from_secs(2)).await;

        sink.stop().unwrap();
        assert_eq!(sink.position(), Duration::ZERO);
        assert!(!sink.has_ended());
    }

    #[test]
    fn start_without_load_fails() {
        let mut sink = SimulatedSink::new(Duration::from_secs(5));
        assert!(matches!(sink.start(), Err(PlaybackError::NoTrackLoaded)));
        assert!(sink.load("").is_err());
    }
}
