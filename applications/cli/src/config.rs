/// Tunebar configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tunebar_playback::{PlayerConfig, RepeatMode, TemplateResolver};
use tunebar_suggest::{ReconnectPolicy, SuggestConfig};

/// Config file read from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "tunebar.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TunebarConfig {
    #[serde(default = "default_suggest")]
    pub suggest: SuggestSettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SuggestSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_max_results")]
    pub max_results: usize,

    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_reconnect_attempts")]
    pub reconnect_attempts: u32,

    #[serde(default = "default_reconnect_backoff_ms")]
    pub reconnect_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_stream_url_template")]
    pub stream_url_template: String,

    #[serde(default)]
    pub repeat: RepeatMode,

    /// Length of a simulated track
    #[serde(default = "default_track_duration_secs")]
    pub track_duration_secs: u64,
}

impl TunebarConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; the default `tunebar.toml` is optional.
    /// Environment variables override the file, e.g.
    /// `TUNEBAR_SUGGEST__BASE_URL` or `TUNEBAR_PLAYBACK__REPEAT`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TUNEBAR")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document (no environment overrides)
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = &self.suggest.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "suggest.base_url must start with http:// or https:// (got '{}')",
                base_url
            )));
        }

        if !self
            .playback
            .stream_url_template
            .contains(TemplateResolver::PLACEHOLDER)
        {
            return Err(CliError::Config(format!(
                "playback.stream_url_template must contain {}",
                TemplateResolver::PLACEHOLDER
            )));
        }

        if self.suggest.reconnect_attempts == 0 {
            return Err(CliError::Config(
                "suggest.reconnect_attempts must be at least 1".to_string(),
            ));
        }

        if self.suggest.max_results == 0 {
            return Err(CliError::Config(
                "suggest.max_results must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn suggest_config(&self) -> SuggestConfig {
        SuggestConfig {
            base_url: self.suggest.base_url.clone(),
            max_results: self.suggest.max_results,
            cache_capacity: self.suggest.cache_capacity,
            request_timeout: Duration::from_secs(self.suggest.request_timeout_secs),
            debounce: Duration::from_millis(self.suggest.debounce_ms),
            reconnect_attempts: self.suggest.reconnect_attempts,
            reconnect_backoff: Duration::from_millis(self.suggest.reconnect_backoff_ms),
        }
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy::new(
            self.suggest.reconnect_attempts,
            Duration::from_millis(self.suggest.reconnect_backoff_ms),
        )
    }

    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig {
            repeat: self.playback.repeat,
        }
    }

    pub fn track_duration(&self) -> Duration {
        Duration::from_secs(self.playback.track_duration_secs)
    }
}

impl Default for TunebarConfig {
    fn default() -> Self {
        Self {
            suggest: default_suggest(),
            playback: default_playback(),
        }
    }
}

// Default values
fn default_suggest() -> SuggestSettings {
    SuggestSettings {
        base_url: default_base_url(),
        debounce_ms: default_debounce_ms(),
        max_results: default_max_results(),
        cache_capacity: default_cache_capacity(),
        request_timeout_secs: default_request_timeout_secs(),
        reconnect_attempts: default_reconnect_attempts(),
        reconnect_backoff_ms: default_reconnect_backoff_ms(),
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_debounce_ms() -> u64 {
    tunebar_suggest::DEFAULT_DEBOUNCE_MS
}

fn default_max_results() -> usize {
    tunebar_suggest::DEFAULT_MAX_RESULTS
}

fn default_cache_capacity() -> usize {
    64
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_reconnect_attempts() -> u32 {
    3
}

fn default_reconnect_backoff_ms() -> u64 {
    1000
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        stream_url_template: default_stream_url_template(),
        repeat: RepeatMode::Off,
        track_duration_secs: default_track_duration_secs(),
    }
}

fn default_stream_url_template() -> String {
    "https://www.youtube.com/watch?v={video_id}".to_string()
}

fn default_track_duration_secs() -> u64 {
    5
}
