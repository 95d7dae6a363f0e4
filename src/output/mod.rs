//! Output module for reporting on stored results
//!
//! This module handles:
//! - Loading per-diet row counts and the latest run from storage
//! - Printing them for the `--stats` command

pub mod stats;

pub use stats::{load_statistics, print_statistics, CrawlStatistics, DietStatistics};
