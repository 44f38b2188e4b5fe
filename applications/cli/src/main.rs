/// Tunebar - search-as-you-type music widget for the terminal
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tunebar_cli::{build_suggestion_service, config::TunebarConfig, session};

#[derive(Parser)]
#[command(name = "tunebar")]
#[command(about = "Song suggestions and a playback queue in your terminal", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./tunebar.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch suggestions once and print them
    Search {
        /// Search text
        #[arg(required = true)]
        query: Vec<String>,

        /// Ask the realtime channel before the HTTP backend
        #[arg(long)]
        realtime: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start the interactive session (default)
    Session {
        /// Ask the realtime channel before the HTTP backend
        #[arg(long)]
        realtime: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tunebar=info,tunebar_cli=info,tunebar_playback=info,tunebar_suggest=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = TunebarConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Session { realtime: false }) {
        Commands::Search {
            query,
            realtime,
            json,
        } => {
            search_once(&config, &query.join(" "), realtime, json).await?;
        }
        Commands::Session { realtime } => {
            let (service, channel) = build_suggestion_service(&config, realtime).await?;
            session::run(&config, service, channel).await?;
        }
    }

    Ok(())
}

async fn search_once(
    config: &TunebarConfig,
    query: &str,
    realtime: bool,
    json: bool,
) -> anyhow::Result<()> {
    let (service, channel) = build_suggestion_service(config, realtime).await?;
    let results = service.fetch(query).await;

    if json {
        let raw: Vec<_> = results.iter().map(|s| s.to_raw()).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "results": raw }))?
        );
    } else if results.is_empty() {
        println!("No suggestions for '{}'", query);
    } else {
        for (i, suggestion) in results.iter().enumerate() {
            println!("{:>2}. {} [{}]", i + 1, suggestion.title, suggestion.video_id);
        }
    }

    let channel_state = channel.state().await;
    tracing::debug!(
        metrics = ?service.metrics(),
        channel = %channel_state,
        "Search finished"
    );
    Ok(())
}
