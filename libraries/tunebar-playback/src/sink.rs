//! Platform-agnostic audio output and stream resolution
//!
//! The core never fetches or decodes audio. A [`StreamResolver`] maps a
//! track to a playable locator and an [`AudioSink`] (an HTML audio element,
//! a native player, a test double) does the rest.

use crate::error::{PlaybackError, Result};
use crate::types::Track;

/// The single audio output owned by the transport
///
/// Implementors wrap whatever actually makes sound. All calls come from the
/// transport, which is the only mutator of sink state.
pub trait AudioSink: Send {
    /// Load a playable locator, replacing whatever was loaded before
    fn load(&mut self, locator: &str) -> Result<()>;

    /// Start playback of the loaded locator from its beginning
    fn start(&mut self) -> Result<()>;

    /// Pause output, keeping the position
    fn pause(&mut self) -> Result<()>;

    /// Continue from the paused position
    fn resume(&mut self) -> Result<()>;

    /// Halt output and rewind to the start
    fn stop(&mut self) -> Result<()>;

    /// Check if the loaded track played through to the end
    ///
    /// This is the "ended" signal; the player polls it.
    fn has_ended(&self) -> bool;
}

/// Maps a track to a locator the sink can load
pub trait StreamResolver: Send {
    fn resolve(&self, track: &Track) -> Result<String>;
}

/// Resolver that substitutes the track id into a URL template
///
/// ```
/// use tunebar_playback::{StreamResolver, TemplateResolver, Track};
///
/// let resolver = TemplateResolver::new("https://www.youtube.com/watch?v={video_id}");
/// let url = resolver.resolve(&Track::new("JGwWNGJdvx8", "Shape of You")).unwrap();
/// assert_eq!(url, "https://www.youtube.com/watch?v=JGwWNGJdvx8");
/// ```
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    template: String,
}

impl TemplateResolver {
    /// Placeholder replaced by the track id
    pub const PLACEHOLDER: &'static str = "{video_id}";

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl StreamResolver for TemplateResolver {
    fn resolve(&self, track: &Track) -> Result<String> {
        let id = track.id.trim();
        if id.is_empty() || !self.template.contains(Self::PLACEHOLDER) {
            return Err(PlaybackError::Unresolvable(track.id.clone()));
        }
        Ok(self.template.replace(Self::PLACEHOLDER, id))
    }
}
