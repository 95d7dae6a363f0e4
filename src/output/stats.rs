//! Statistics generation from the recipe database
//!
//! This module provides functionality for extracting and displaying
//! what previous crawls have stored.

use crate::config::Config;
use crate::progress::ProgressTracker;
use crate::storage::{RunRecord, Storage};
use crate::SieveError;

/// Stored rows for one diet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietStatistics {
    pub name: String,
    pub table: String,

    /// `None` when the table has not been created yet
    pub recipes: Option<u64>,
}

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// One entry per enabled diet, in configuration order
    pub diets: Vec<DietStatistics>,

    /// Last fully processed listing page
    pub checkpoint: u32,

    /// Most recent run, if any
    pub latest_run: Option<RunRecord>,
}

impl CrawlStatistics {
    /// Rows across all diet tables
    pub fn total_rows(&self) -> u64 {
        self.diets.iter().filter_map(|d| d.recipes).sum()
    }
}

/// Loads statistics from storage and the checkpoint file
pub fn load_statistics(
    storage: &dyn Storage,
    config: &Config,
) -> Result<CrawlStatistics, SieveError> {
    let diets = config
        .enabled_diets()
        .map(|entry| {
            let recipes = match storage.count_recipes(&entry.table) {
                Ok(count) => Some(count),
                Err(e) => {
                    tracing::debug!("No row count for {}: {}", entry.table, e);
                    None
                }
            };
            DietStatistics {
                name: entry.name.clone(),
                table: entry.table.clone(),
                recipes,
            }
        })
        .collect();

    let checkpoint = ProgressTracker::new(&config.progress.checkpoint_path).read_checkpoint();
    let latest_run = storage.get_latest_run()?;

    Ok(CrawlStatistics {
        diets,
        checkpoint,
        latest_run,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Recipes by Diet:");
    for diet in &stats.diets {
        match diet.recipes {
            Some(count) => println!("  {} ({}): {}", diet.name, diet.table, count),
            None => println!("  {} ({}): table not created", diet.name, diet.table),
        }
    }
    println!("  Total rows: {}", stats.total_rows());
    println!();

    println!("Progress:");
    println!("  Last completed page: {}", stats.checkpoint);
    println!();

    match &stats.latest_run {
        Some(run) => {
            println!("Latest Run (#{}):", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            if let Some(finished) = &run.finished_at {
                println!("  Finished: {}", finished);
            }
            match run.last_page {
                Some(last) => println!("  Pages: {} -> {}", run.start_page, last),
                None => println!("  Started after page: {}", run.start_page),
            }
            println!("  Config hash: {}", run.config_hash);
        }
        None => println!("No crawl runs recorded yet"),
    }
}
