/// Interactive terminal session
///
/// Stands in for the widget's UI binding: typed text goes to the debounced
/// search, short commands drive the player, and the player's events are
/// rendered as status lines.
use crate::config::TunebarConfig;
use crate::sink::SimulatedSink;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use tunebar_playback::{Player, PlayerEvent, TemplateResolver, Track, TransportState, UiNotifier};
use tunebar_suggest::{
    DebouncedSearch, LocalConnection, RealtimeChannel, Suggestion, SuggestionBatch,
    SuggestionService,
};

/// How often the simulated sink is polled for the end of a track
const TICK_INTERVAL: Duration = Duration::from_millis(250);

const HELP: &str = "\
Type anything to search. Commands:
  add N      queue suggestion N          play N     play suggestion N
  goto N     play queue entry N          p          play / pause
  next, prev skip                        stop       stop and rewind
  shuffle    toggle shuffle              repeat     cycle repeat mode
  queue      show the queue              metrics    show counters
  reconnect  retry the realtime channel  help       this text
  quit       leave";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    Add(usize),
    Play(usize),
    Goto(usize),
    Toggle,
    Next,
    Previous,
    Stop,
    Shuffle,
    Repeat,
    Queue,
    Metrics,
    Reconnect,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line
    ///
    /// Anything that is not a well-formed command is a search, so song
    /// names like "play that funky music" still reach the search box.
    /// Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        let word = word.to_ascii_lowercase();
        let number = rest.parse::<usize>().ok().filter(|n| *n > 0);

        let command = match (word.as_str(), number, rest.is_empty()) {
            ("search" | "s", _, false) => Command::Search(rest.to_string()),
            ("add" | "a", Some(n), _) => Command::Add(n),
            ("play", Some(n), _) => Command::Play(n),
            ("goto" | "g", Some(n), _) => Command::Goto(n),
            ("p" | "pause" | "toggle", _, true) => Command::Toggle,
            ("next" | "n", _, true) => Command::Next,
            ("prev" | "previous" | "b", _, true) => Command::Previous,
            ("stop", _, true) => Command::Stop,
            ("shuffle", _, true) => Command::Shuffle,
            ("repeat", _, true) => Command::Repeat,
            ("queue", _, true) => Command::Queue,
            ("metrics", _, true) => Command::Metrics,
            ("reconnect", _, true) => Command::Reconnect,
            ("help" | "?", _, true) => Command::Help,
            ("quit" | "exit", _, true) => Command::Quit,
            _ => Command::Search(line.to_string()),
        };
        Some(command)
    }
}

/// Notifier that marks the status line dirty
#[derive(Debug, Default)]
pub struct TerminalNotifier {
    dirty: AtomicBool,
}

impl TerminalNotifier {
    /// Clear the flag, returning whether a refresh was requested
    pub fn take(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }
}

impl UiNotifier for TerminalNotifier {
    fn request_refresh(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }
}

pub struct Session<W> {
    player: Player,
    search: DebouncedSearch,
    notifier: Arc<TerminalNotifier>,
    channel: Option<RealtimeChannel<LocalConnection>>,
    suggestions: Vec<Suggestion>,
    out: W,
}

impl<W: Write> Session<W> {
    pub fn new(
        player: Player,
        search: DebouncedSearch,
        notifier: Arc<TerminalNotifier>,
        out: W,
    ) -> Self {
        Self {
            player,
            search,
            notifier,
            channel: None,
            suggestions: Vec::new(),
            out,
        }
    }

    /// Let the `reconnect` command reach the realtime channel
    pub fn with_channel(mut self, channel: RealtimeChannel<LocalConnection>) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Handle one input line; returns false when the session should end
    pub fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let Some(command) = Command::parse(line) else {
            return Ok(true);
        };
        debug!(?command, "Session command");

        match command {
            Command::Search(query) => {
                let generation = self.search.input(query);
                debug!(generation, "Search input");
            }
            Command::Add(n) => match self.suggestion(n) {
                Some(track) => {
                    writeln!(self.out, "Queued: {}", track.title)?;
                    self.player.enqueue(track);
                }
                None => writeln!(self.out, "No suggestion #{}", n)?,
            },
            Command::Play(n) => match self.suggestion(n) {
                Some(track) => {
                    if !self.player.play(track) {
                        writeln!(self.out, "Could not play suggestion #{}", n)?;
                    }
                }
                None => writeln!(self.out, "No suggestion #{}", n)?,
            },
            Command::Goto(n) => match n.checked_sub(1) {
                Some(index) if index < self.player.get_queue().len() => {
                    self.player.play_at(index);
                }
                _ => writeln!(self.out, "No queue entry #{}", n)?,
            },
            Command::Toggle => {
                self.player.toggle_play_pause();
            }
            Command::Next => {
                if self.player.skip_next().is_none() {
                    writeln!(self.out, "End of queue")?;
                }
            }
            Command::Previous => {
                if self.player.skip_previous().is_none() {
                    writeln!(self.out, "Start of queue")?;
                }
            }
            Command::Stop => self.player.stop(),
            Command::Shuffle => {
                let enabled = self.player.toggle_shuffle();
                writeln!(self.out, "Shuffle {}", if enabled { "on" } else { "off" })?;
            }
            Command::Repeat => {
                let mode = self.player.cycle_repeat();
                writeln!(self.out, "Repeat {}", mode)?;
            }
            Command::Queue => self.print_queue()?,
            Command::Metrics => self.print_metrics()?,
            Command::Reconnect => self.reconnect()?,
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => {
                self.search.cancel();
                self.player.stop();
                self.flush_events()?;
                return Ok(false);
            }
        }

        self.flush_events()?;
        Ok(true)
    }

    /// Replace the suggestion list with a freshly published batch
    pub fn show_suggestions(&mut self, batch: SuggestionBatch) -> io::Result<()> {
        if batch.results.is_empty() {
            writeln!(self.out, "No suggestions for '{}'", batch.query)?;
        } else {
            writeln!(self.out, "Suggestions for '{}':", batch.query)?;
            for (i, suggestion) in batch.results.iter().enumerate() {
                writeln!(self.out, "  {}. {}", i + 1, suggestion.title)?;
            }
        }
        self.suggestions = batch.results;
        Ok(())
    }

    /// Poll the sink; called on every timer tick
    pub fn tick(&mut self) -> io::Result<()> {
        if self.player.tick() {
            self.flush_events()?;
        }
        Ok(())
    }

    pub fn greet(&mut self) -> io::Result<()> {
        writeln!(self.out, "Tunebar - type to search, 'help' for commands")
    }

    /// Kick off `reinitialize` in the background; the outcome is logged
    fn reconnect(&mut self) -> io::Result<()> {
        let Some(channel) = self.channel.clone() else {
            return writeln!(self.out, "No realtime channel");
        };

        writeln!(self.out, "Reconnecting realtime channel")?;
        tokio::spawn(async move {
            match channel.reinitialize().await {
                Ok(()) => info!("Realtime channel back"),
                Err(e) => warn!(error = %e, "Realtime channel still unavailable"),
            }
        });
        Ok(())
    }

    fn suggestion(&self, n: usize) -> Option<Track> {
        self.suggestions
            .get(n.checked_sub(1)?)
            .cloned()
            .map(Track::from)
    }

    fn flush_events(&mut self) -> io::Result<()> {
        for event in self.player.drain_events() {
            match event {
                PlayerEvent::TrackChanged { track_id, .. } => {
                    let title = self
                        .player
                        .get_current_track()
                        .filter(|t| t.id == track_id)
                        .map_or(track_id.clone(), |t| t.title.clone());
                    writeln!(self.out, "Now playing: {}", title)?;
                }
                PlayerEvent::StateChanged { state } => {
                    writeln!(self.out, "[{}]", state_label(state))?;
                }
                PlayerEvent::Error { message } => {
                    writeln!(self.out, "Error: {}", message)?;
                }
                PlayerEvent::TrackFinished { .. }
                | PlayerEvent::QueueChanged { .. }
                | PlayerEvent::RepeatChanged { .. }
                | PlayerEvent::ShuffleChanged { .. } => {}
            }
        }

        if self.notifier.take() {
            self.print_status()?;
        }
        Ok(())
    }

    fn print_status(&mut self) -> io::Result<()> {
        let queue = self.player.get_queue();
        let position = queue.position().map_or(0, |p| p + 1);
        let title = self
            .player
            .get_current_track()
            .map_or("-", |t| t.title.as_str());

        writeln!(
            self.out,
            "[{}] {} | {}/{} | repeat {} | shuffle {}",
            state_label(self.player.get_state()),
            title,
            position,
            queue.len(),
            self.player.get_repeat(),
            if self.player.is_shuffled() { "on" } else { "off" }
        )
    }

    fn print_queue(&mut self) -> io::Result<()> {
        let queue = self.player.get_queue();
        if queue.is_empty() {
            return writeln!(self.out, "Queue is empty");
        }

        for (i, track) in queue.tracks().enumerate() {
            let marker = if queue.position() == Some(i) { '>' } else { ' ' };
            writeln!(self.out, "{} {}. {}", marker, i + 1, track.title)?;
        }
        Ok(())
    }

    fn print_metrics(&mut self) -> io::Result<()> {
        let metrics = self.player.metrics();
        writeln!(
            self.out,
            "plays {} | pauses {} | next {} | previous {} | shuffles {} | repeat toggles {}",
            metrics.plays,
            metrics.pauses,
            metrics.skips_next,
            metrics.skips_previous,
            metrics.shuffles,
            metrics.repeat_toggles
        )
    }
}

fn state_label(state: TransportState) -> &'static str {
    match state {
        TransportState::Stopped => "stopped",
        TransportState::Playing => "playing",
        TransportState::Paused => "paused",
    }
}

/// Build the player the session drives
pub fn build_player(config: &TunebarConfig, notifier: Arc<TerminalNotifier>) -> Player {
    Player::new(
        config.player_config(),
        Box::new(SimulatedSink::new(config.track_duration())),
        Box::new(TemplateResolver::new(
            config.playback.stream_url_template.as_str(),
        )),
        notifier,
    )
}

/// Run the interactive session on stdin/stdout until `quit` or EOF
pub async fn run(
    config: &TunebarConfig,
    service: Arc<SuggestionService>,
    channel: RealtimeChannel<LocalConnection>,
) -> anyhow::Result<()> {
    let notifier = Arc::new(TerminalNotifier::default());
    let player = build_player(config, Arc::clone(&notifier));
    let (search, mut results) = DebouncedSearch::new(service, config.suggest_config().debounce);

    let mut session = Session::new(player, search, notifier, io::stdout()).with_channel(channel);
    session.greet()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !session.handle_line(&line)? {
                            break;
                        }
                    }
                    None => break,
                }
            }
            changed = results.changed() => {
                if changed.is_err() {
                    break;
                }
                let batch = results.borrow_and_update().clone();
                session.show_suggestions(batch)?;
            }
            _ = ticker.tick() => session.tick()?,
        }
        session.out.flush()?;
    }

    session.print_metrics()?;
    Ok(())
}
