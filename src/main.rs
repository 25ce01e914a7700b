//! Ripple-Engine main entry point
//!
//! This is the command-line interface: it fetches the seed URLs listed in a
//! configuration file through the batch engine and reports the counters.

use clap::Parser;
use ripple_engine::config::{load_config_with_hash, Config};
use ripple_engine::stats::print_statistics;
use ripple_engine::{
    build_engine, FollowUps, HandlerResult, Request, Response, Scheduler, Spider, StatsCollector,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ripple-Engine: a batch-driven crawl engine
///
/// Loads a TOML configuration, downloads its seed URLs in bounded concurrent
/// batches, and prints the resulting counters.
#[derive(Parser, Debug)]
#[command(name = "ripple-engine")]
#[command(version)]
#[command(about = "A batch-driven crawl engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

/// Fetches the configured seeds and logs each response
struct SeedSpider {
    seeds: Vec<String>,
}

impl Spider for SeedSpider {
    fn name(&self) -> &str {
        "seeds"
    }

    fn start_requests(&mut self) -> Box<dyn Iterator<Item = Request> + '_> {
        Box::new(self.seeds.iter().enumerate().filter_map(|(i, seed)| {
            match Request::get(seed) {
                Ok(request) => Some(request.with_context((i as u64).into())),
                Err(e) => {
                    tracing::warn!("Skipping seed {}: {}", seed, e);
                    None
                }
            }
        }))
    }

    fn parse(&mut self, response: Response, _: &mut Scheduler<'_>) -> HandlerResult {
        tracing::info!(
            "{} {} ({} bytes)",
            response.status().as_u16(),
            response.url(),
            response.body().len()
        );
        Ok(FollowUps::none())
    }

    fn finish(&mut self) {
        tracing::info!("All {} seeds resolved", self.seeds.len());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Loaded before logging so the debug flag can raise the filter
    let loaded = load_config_with_hash(&cli.config);
    let debug = matches!(&loaded, Ok((config, _)) if config.engine.debug);
    setup_logging(cli.verbose, cli.quiet, debug);

    tracing::info!("Configuration file: {}", cli.config.display());
    let config = match loaded {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, debug: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose.max(u8::from(debug)) {
            0 => EnvFilter::new("ripple_engine=info,warn"),
            1 => EnvFilter::new("ripple_engine=debug,info"),
            2 => EnvFilter::new("ripple_engine=trace,debug"),
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

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Ripple-Engine Dry Run ===\n");

    println!("Engine:");
    println!("  Concurrent requests: {}", config.engine.concurrent_requests);
    println!("  Debug: {}", config.engine.debug);

    println!("\nDownloader:");
    println!("  Kind: {}", config.downloader.kind);
    println!("  Timeout: {}s", config.downloader.timeout_secs);
    println!("  User agent: {}", config.downloader.user_agent);
    println!("  Cookies: {}", config.downloader.cookies);
    println!("  HTTP errors as failures: {}", config.downloader.http_errors);

    println!("\nScheduler:");
    println!("  Kind: {}", config.scheduler.kind);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let stats = Arc::new(StatsCollector::new());
    let mut engine = build_engine(&config, stats.clone())?;

    tracing::info!("Total seed URLs: {}", config.seeds.len());

    let mut spider = SeedSpider {
        seeds: config.seeds.clone(),
    };
    engine.open_spider(&mut spider).await;

    print_statistics(&stats);
    Ok(())
}
