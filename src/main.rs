//! Polite-Spider main entry point
//!
//! This is the command-line interface for the Polite-Spider crawler. Each
//! invocation performs at most one bounded crawl run.

use anyhow::Context;
use clap::Parser;
use polite_spider::config::{load_config_with_hash, Config};
use polite_spider::crawler::run_crawl;
use polite_spider::frontier::{load_seeds, FrontierStore};
use polite_spider::url::is_allowed_domain;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Polite-Spider: a bounded, resumable web crawler
///
/// Every run fetches at most `max-pages` pages from the persisted frontier,
/// honouring the domain allow-list and robots.txt, then saves the frontier so
/// the next run continues where this one stopped.
#[derive(Parser, Debug)]
#[command(name = "polite-spider")]
#[command(version = "1.0.0")]
#[command(about = "A bounded, resumable polite web crawler", long_about = None)]
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

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with = "status")]
    dry_run: bool,

    /// Show the persisted frontier sizes and exit
    #[arg(long, conflicts_with = "dry_run")]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::debug!("Configuration hash: {}", config_hash);

    if cli.dry_run {
        handle_dry_run(&config)
    } else if cli.status {
        handle_status(&config)
    } else {
        handle_crawl(config, &config_hash).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("polite_spider=info,warn"),
            1 => EnvFilter::new("polite_spider=debug,info"),
            2 => EnvFilter::new("polite_spider=trace,debug"),
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

/// Handles the --dry-run mode: prints the effective configuration and seeds
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Polite-Spider Dry Run ===\n");

    println!("Crawler:");
    println!("  Max pages per run: {}", config.crawler.max_pages);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!(
        "  Robots: {} (fail-{})",
        config.crawler.robots_scheme,
        if config.crawler.robots_fail_open { "open" } else { "closed" }
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nAllowed Domains ({}):", config.domains.allowed.len());
    if config.domains.allowed.is_empty() {
        println!("  (unrestricted)");
    }
    for domain in &config.domains.allowed {
        println!("  - {}", domain);
    }

    println!("\nFrontier:");
    println!("  Visited: {}", config.frontier.visited_path.display());
    println!("  Pending: {}", config.frontier.pending_path.display());
    println!("  Seeds: {}", config.frontier.seeds_path.display());

    let frontier = FrontierStore::from_config(&config.frontier).load()?;
    println!("\n✓ Configuration is valid");

    if frontier.pending.is_empty() {
        let seeds: Vec<String> = load_seeds(&config.frontier.seeds_path)?
            .into_iter()
            .filter(|seed| is_allowed_domain(seed, &config.domains.allowed))
            .collect();
        println!("✓ Would bootstrap the frontier with {} seed URLs", seeds.len());
        for seed in &seeds {
            println!("    * {}", seed);
        }
    } else {
        println!(
            "✓ Would resume with {} pending URLs ({} already visited)",
            frontier.pending.len(),
            frontier.visited.len()
        );
    }

    Ok(())
}

/// Handles the --status mode: prints persisted frontier sizes
fn handle_status(config: &Config) -> anyhow::Result<()> {
    let store = FrontierStore::from_config(&config.frontier);
    let frontier = store.load()?;

    println!("Visited ({}): {}", store.visited_path().display(), frontier.visited.len());
    println!("Pending ({}): {}", store.pending_path().display(), frontier.pending.len());
    if let Some(next) = frontier.pending.front() {
        println!("Next URL: {}", next);
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Max pages: {}, allowed domains: {}",
        config.crawler.max_pages,
        config.domains.allowed.len()
    );

    match run_crawl(config, config_hash).await {
        Ok(summary) => {
            tracing::info!(
                "Crawl completed: {} pages fetched in {}s",
                summary.pages_fetched,
                summary.duration_seconds()
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
