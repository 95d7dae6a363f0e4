//! Configuration module for Diet-Sieve
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use diet_sieve::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("diet-sieve.toml")).unwrap();
//! println!("Crawling {} diets", config.enabled_diets().count());
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, DatabaseConfig, DietEntry, ProgressConfig, SiteConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash};

pub(crate) use validation::validate_table_name;
