//! Webharvest main entry point
//!
//! Command-line interface for the webharvest crawl engine.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use webharvest::config::load_config_with_hash;
use webharvest::crawler::run_crawl;
use webharvest::sink::LogSink;

/// Webharvest: a distributed crawl engine
///
/// Crawls seed URLs while deduplicating against a durable seen-set,
/// honoring blocklist and robots exclusion policy, and emitting normalized
/// documents to a sink.
#[derive(Parser, Debug)]
#[command(name = "webharvest")]
#[command(version)]
#[command(about = "A distributed crawl engine", long_about = None)]
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
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let stats = run_crawl(&config, Arc::new(LogSink::new())).await?;

    tracing::info!(
        "Done: {} stored, {} skipped, {} failed",
        stats.stored,
        stats.skipped,
        stats.failed
    );

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webharvest=info,warn"),
            1 => EnvFilter::new("webharvest=debug,info"),
            2 => EnvFilter::new("webharvest=trace,debug"),
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

/// Prints the --dry-run report: validated config and planned crawl
fn print_dry_run(config: &webharvest::config::Config) {
    println!("=== Webharvest Dry Run ===\n");

    println!("Crawler:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!("  Max redirects: {}", config.crawler.max_redirects);
    match config.crawler.epoch_timeout_secs {
        Some(secs) => println!("  Epoch deadline: {}s", secs),
        None => println!("  Epoch deadline: none"),
    }

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nPolicy:");
    println!(
        "  Blocked substrings ({}):",
        config.policy.blocked_substrings.len()
    );
    for entry in &config.policy.blocked_substrings {
        println!("    - {}", entry);
    }
    println!(
        "  Blocked domains ({}):",
        config.policy.blocked_domains.len()
    );
    for entry in &config.policy.blocked_domains {
        println!("    - {}", entry);
    }
    println!("  Respect robots.txt: {}", config.policy.respect_robots);

    println!("\nSeen-set backend: {:?}", config.seen.backend);

    println!("\nSeeds ({}):", config.seeds.len());
    for seed in &config.seeds {
        match &seed.region {
            Some(region) => println!(
                "  - {} (priority {}, region {})",
                seed.url, seed.priority, region
            ),
            None => println!("  - {} (priority {})", seed.url, seed.priority),
        }
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} seed URLs", config.seeds.len());
}
