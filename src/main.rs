//! Sumi-Stream main entry point
//!
//! This is the command-line interface for the Sumi-Stream feed reader.

use anyhow::Context;
use clap::Parser;
use futures::TryStreamExt;
use std::path::PathBuf;
use sumi_stream::config::{load_config_with_hash, Config};
use sumi_stream::entity::timestamp::format_timestamp;
use sumi_stream::{Direction, EventStore};
use tracing_subscriber::EnvFilter;

/// Sumi-Stream: a reader for paginated event-stream feeds
///
/// Sumi-Stream walks a stream's page chain in either direction, enriches every
/// entry with its full event document, and prints the events as JSON lines.
#[derive(Parser, Debug)]
#[command(name = "sumi-stream")]
#[command(version = "1.0.0")]
#[command(about = "A reader for paginated event-stream feeds", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Name of the stream to read
    #[arg(value_name = "STREAM")]
    stream: String,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Read newest events first
    #[arg(long, conflicts_with_all = ["event", "head"])]
    backwards: bool,

    /// Read a single event by number and exit
    #[arg(long, value_name = "N", conflicts_with = "head")]
    event: Option<u64>,

    /// Show the stream's head page and exit
    #[arg(long)]
    head: bool,

    /// Stop after this many events
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Override the configured enrichment concurrency
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::debug!("Configuration loaded successfully (hash: {})", hash);

    let store = build_store(&config, cli.concurrency)?;

    if cli.head {
        handle_head(&store, &cli.stream).await
    } else if let Some(event_number) = cli.event {
        handle_event(&store, &cli.stream, event_number).await
    } else {
        let direction = if cli.backwards {
            Direction::Backward
        } else {
            Direction::Forward
        };
        handle_read(&store, &cli.stream, direction, cli.limit).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_stream=info,warn"),
            1 => EnvFilter::new("sumi_stream=debug,info"),
            2 => EnvFilter::new("sumi_stream=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Events go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn build_store(config: &Config, concurrency: Option<usize>) -> anyhow::Result<EventStore> {
    let store = EventStore::from_config(config).context("Failed to build HTTP client")?;

    Ok(match concurrency {
        Some(n) if n >= 1 => store.with_concurrency(n),
        Some(n) => anyhow::bail!("--concurrency must be at least 1, got {}", n),
        None => store,
    })
}

/// Handles the --head mode: prints a summary of the root page
async fn handle_head(store: &EventStore, stream: &str) -> anyhow::Result<()> {
    let page = store.stream(stream).read().await?;

    println!("=== {} ===\n", page.title);
    println!("  Stream: {}", page.stream_id);
    println!("  Id: {}", page.id);
    println!("  Updated: {}", format_timestamp(&page.updated));
    println!("  Head of stream: {}", page.head_of_stream);
    if let Some(etag) = &page.e_tag {
        println!("  ETag: {}", etag);
    }

    println!("\nEntries ({}):", page.len());
    for entry in &page.entries {
        println!("  - {} ({})", entry.title, entry.summary);
    }

    Ok(())
}

/// Handles the --event mode: prints one event
async fn handle_event(store: &EventStore, stream: &str, event_number: u64) -> anyhow::Result<()> {
    let event = store.stream(stream).read_event(event_number).await?;
    println!("{}", serde_json::to_string(&event)?);
    Ok(())
}

/// Handles the main read operation: prints every event as one JSON line
async fn handle_read(
    store: &EventStore,
    stream: &str,
    direction: Direction,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let start_time = std::time::Instant::now();
    let mut events = store.stream(stream).walk(direction);
    let mut count = 0usize;

    while limit.map_or(true, |max| count < max) {
        let event = match events.try_next().await {
            Ok(Some(event)) => event,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Read of {} aborted after {} events: {}", stream, count, e);
                return Err(e.into());
            }
        };

        println!("{}", serde_json::to_string(&event)?);
        count += 1;
    }

    tracing::info!(
        "Read {} events from {} in {:?}",
        count,
        stream,
        start_time.elapsed()
    );
    Ok(())
}
