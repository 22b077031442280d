//! Bestseller-Harvest main entry point
//!
//! This is the command-line interface for the best-seller list harvester.

use anyhow::Context;
use bestseller_harvest::config::{load_config_with_hash, validate, Config};
use bestseller_harvest::crawler::{harvest, Resource};
use bestseller_harvest::output::{print_reading_list, print_summary};
use bestseller_harvest::state::CrawlState;
use bestseller_harvest::storage::{JsonStateStore, StateStore};
use bestseller_harvest::ConfigError;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Bestseller-Harvest: an incremental best-seller list harvester
///
/// Crawls the weekly number ones and the audio best-seller lists from the
/// catalog API, resuming where the previous run stopped, and prints the
/// titles that made both lists.
#[derive(Parser, Debug)]
#[command(name = "bestseller-harvest")]
#[command(version)]
#[command(about = "An incremental best-seller list harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to the JSON state file, overriding the configured one
    #[arg(short, long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Start a fresh harvest, ignoring previously persisted state
    #[arg(long)]
    fresh: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(state) = &cli.state {
        config.output.state_path = state.display().to_string();
        validate(&config).context("Invalid state path")?;
    }

    let store = JsonStateStore::new(&config.output.state_path);

    if cli.dry_run {
        return handle_dry_run(&config, &store, cli.fresh);
    }

    if let Err(e) = handle_harvest(&config, store, cli.fresh).await {
        tracing::error!("Harvest failed: {:#}", e);
        return Err(e);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bestseller_harvest=info,warn"),
            1 => EnvFilter::new("bestseller_harvest=debug,info"),
            2 => EnvFilter::new("bestseller_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows where each crawl would start
fn handle_dry_run(config: &Config, store: &JsonStateStore, fresh: bool) -> anyhow::Result<()> {
    let state = if fresh {
        CrawlState::new()
    } else {
        store
            .load()
            .with_context(|| format!("Failed to load state {}", store.path().display()))?
    };

    println!("=== Bestseller-Harvest Dry Run ===\n");

    println!("API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Key variable: {}", config.api.api_key_env);
    println!("  Timeout: {}s", config.api.timeout_secs);
    println!("  Transport retries: {}", config.api.transport_retries);

    println!("\nRate Limit:");
    println!(
        "  {} calls per {}s",
        config.rate_limit.max_calls, config.rate_limit.period_secs
    );

    println!("\nState:");
    println!("  File: {}", store.path().display());
    println!("  Reading list: {}", state.reading_list.len());

    println!("\nCrawls:");
    for resource in [
        Resource::NumberOnes,
        Resource::audio_from_config(&config.crawl),
    ] {
        let held = state.records(&resource).len();
        match state.cursor(&resource).query_date(resource.epoch(&config.crawl)) {
            Some(date) => println!(
                "  {}: {} held, would start at {}",
                resource.name(),
                held,
                date
            ),
            None => println!(
                "  {}: {} held, exhausted, nothing to fetch",
                resource.name(),
                held
            ),
        }
    }
    println!(
        "  Audio categories: {}",
        config.crawl.audio_categories.join(", ")
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(
    config: &Config,
    store: JsonStateStore,
    fresh: bool,
) -> anyhow::Result<()> {
    let api_key = std::env::var(&config.api.api_key_env)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingApiKey(config.api.api_key_env.clone()))?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current request");
            ctrl_c.cancel();
        }
    });

    if !fresh {
        tracing::info!("Starting harvest (resuming from {})", store.path().display());
    }
    let (summary, state, _) = harvest(config, &api_key, store, fresh, cancel).await?;
    tracing::info!("Harvest completed successfully");

    if config.output.print_reading_list {
        print_reading_list(&state.reading_list).context("Failed to print reading list")?;
    }
    print_summary(&summary);

    Ok(())
}
