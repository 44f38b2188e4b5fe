//! Shared helpers for integration tests

#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tunebar_playback::{
    AudioSink, Player, PlayerConfig, RepeatMode, Result, ShufflePolicy, StreamResolver, Track,
    UiNotifier,
};

/// Sink that remembers loaded locators and lets the test end a track
#[derive(Debug, Default, Clone)]
pub struct ScriptedSink {
    loaded: Arc<Mutex<Vec<String>>>,
    ended: Arc<Mutex<bool>>,
    paused: Arc<Mutex<bool>>,
}

impl ScriptedSink {
    pub fn loaded(&self) -> Vec<String> {
        self.loaded.lock().unwrap().clone()
    }

    pub fn finish(&self) {
        *self.ended.lock().unwrap() = true;
    }

    pub fn is_paused(&self) -> bool {
        *self.paused.lock().unwrap()
    }
}

impl AudioSink for ScriptedSink {
    fn load(&mut self, locator: &str) -> Result<()> {
        self.loaded.lock().unwrap().push(locator.to_string());
        *self.ended.lock().unwrap() = false;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        *self.paused.lock().unwrap() = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        *self.paused.lock().unwrap() = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        *self.paused.lock().unwrap() = false;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        *self.paused.lock().unwrap() = false;
        Ok(())
    }

    fn has_ended(&self) -> bool {
        *self.ended.lock().unwrap()
    }
}

pub struct BareIdResolver;

impl StreamResolver for BareIdResolver {
    fn resolve(&self, track: &Track) -> Result<String> {
        Ok(track.id.clone())
    }
}

#[derive(Debug, Default)]
pub struct CountingNotifier(AtomicUsize);

impl CountingNotifier {
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl UiNotifier for CountingNotifier {
    fn request_refresh(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn create_track(id: &str) -> Track {
    Track::new(id, format!("Song {}", id)).with_thumbnail(format!("https://i.ytimg.com/vi/{}/default.jpg", id))
}

pub fn create_player(repeat: RepeatMode) -> (Player, ScriptedSink, Arc<CountingNotifier>) {
    let sink = ScriptedSink::default();
    let notifier = Arc::new(CountingNotifier::default());
    let player = Player::with_shuffle_policy(
        PlayerConfig { repeat },
        Box::new(sink.clone()),
        Box::new(BareIdResolver),
        notifier.clone(),
        ShufflePolicy::with_rng(StdRng::seed_from_u64(1234)),
    );
    (player, sink, notifier)
}

pub fn player_with(ids: &[&str], repeat: RepeatMode) -> (Player, ScriptedSink) {
    let (mut player, sink, _) = create_player(repeat);
    player.enqueue_all(ids.iter().map(|id| create_track(id)));
    (player, sink)
}
