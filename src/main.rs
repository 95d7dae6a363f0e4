//! Diet-Sieve main entry point
//!
//! This is the command-line interface for the Diet-Sieve recipe crawler.

use clap::Parser;
use diet_sieve::config::{load_config_with_hash, Config};
use diet_sieve::crawler::run_crawl;
use diet_sieve::diet::load_diet_filters;
use diet_sieve::progress::ProgressTracker;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Diet-Sieve: a resumable recipe crawler with diet filtering
///
/// Diet-Sieve walks a recipe site's listing pages, checks every recipe's
/// ingredients and tags against the configured diet filters, and stores
/// the matches in one SQLite table per diet.
#[derive(Parser, Debug)]
#[command(name = "diet-sieve")]
#[command(version = "1.0.0")]
#[command(about = "A resumable recipe crawler with diet filtering", long_about = None)]
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

    /// Ignore the saved checkpoint and start from the first page
    #[arg(long)]
    fresh: bool,

    /// Validate config and filters and show what would be crawled
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show stored row counts and the latest run, then exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, cli.fresh)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(&config, &config_hash, cli.fresh).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("diet_sieve=info,warn"),
            1 => EnvFilter::new("diet_sieve=debug,info"),
            2 => EnvFilter::new("diet_sieve=trace,debug"),
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

/// Handles the --dry-run mode: loads every filter and shows where the crawl would start
fn handle_dry_run(config: &Config, fresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Diet-Sieve Dry Run ===\n");

    println!("Site:");
    println!("  Root URL: {}", config.site.root_url);
    println!("  Page parameter: {}", config.site.page_param);

    println!("\nCrawler Configuration:");
    println!(
        "  Page load timeout: {}ms",
        config.crawler.page_load_timeout_ms
    );
    println!("  Failure delay: {}ms", config.crawler.failure_delay_ms);
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nOutput:");
    println!("  Database: {}", config.database.path.display());
    println!("  Checkpoint: {}", config.progress.checkpoint_path.display());
    println!("  Failure log: {}", config.progress.failure_log_path.display());

    let filters = load_diet_filters(config)?;
    println!("\nDiets ({}):", filters.len());
    for filter in &filters {
        println!("  - {} -> {}", filter.name(), filter.table());
        println!(
            "    add: {}, eliminate: {}, avoid tags: {}",
            filter.add_list().len(),
            filter.eliminate_list().len(),
            filter.recipes_to_avoid().len()
        );
    }

    let checkpoint = if fresh {
        0
    } else {
        ProgressTracker::new(&config.progress.checkpoint_path).read_checkpoint()
    };

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling at page {}", checkpoint + 1);

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use diet_sieve::output::{load_statistics, print_statistics};
    use diet_sieve::storage::open_storage;

    println!("Database: {}\n", config.database.path.display());

    let storage = open_storage(&config.database.path)?;
    let stats = load_statistics(&storage, config)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    config_hash: &str,
    fresh: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if fresh {
        tracing::info!("Starting fresh crawl (ignoring saved checkpoint)");
    } else {
        tracing::info!("Starting crawl (will resume from saved checkpoint)");
    }

    tracing::info!(
        "Diets: {}",
        config
            .enabled_diets()
            .map(|d| d.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    match run_crawl(config, config_hash, fresh).await {
        Ok(report) => {
            tracing::info!(
                "Crawl completed: {} rows stored, {} recipes failed",
                report.rows_stored,
                report.retry_failed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
