use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Diet-Sieve
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    pub database: DatabaseConfig,
    #[serde(default, rename = "diet")]
    pub diets: Vec<DietEntry>,
}

impl Config {
    /// Diet entries that take part in the crawl
    pub fn enabled_diets(&self) -> impl Iterator<Item = &DietEntry> {
        self.diets.iter().filter(|d| d.enabled)
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Listing root, e.g. `https://www.tarladalal.com/recipes/`
    #[serde(rename = "root-url")]
    pub root_url: String,

    /// Query parameter carrying the listing page number
    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Upper bound for loading a single page (milliseconds)
    #[serde(rename = "page-load-timeout-ms", default = "default_page_load_timeout")]
    pub page_load_timeout_ms: u64,

    /// Pause after each failed recipe (milliseconds)
    #[serde(rename = "failure-delay-ms", default = "default_failure_delay")]
    pub failure_delay_ms: u64,

    /// User agent sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl CrawlerConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    pub fn failure_delay(&self) -> Duration {
        Duration::from_millis(self.failure_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_load_timeout_ms: default_page_load_timeout(),
            failure_delay_ms: default_failure_delay(),
            user_agent: default_user_agent(),
        }
    }
}

/// Resume and audit file locations
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressConfig {
    /// File holding the last fully processed listing page
    #[serde(rename = "checkpoint-path", default = "default_checkpoint_path")]
    pub checkpoint_path: PathBuf,

    /// Append-only log of recipe URLs that failed
    #[serde(rename = "failure-log-path", default = "default_failure_log_path")]
    pub failure_log_path: PathBuf,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            checkpoint_path: default_checkpoint_path(),
            failure_log_path: default_failure_log_path(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
}

/// One diet variant: its names and where its word lists live
#[derive(Debug, Clone, Deserialize)]
pub struct DietEntry {
    /// Short diet name used in logs (e.g. "LCHF")
    pub name: String,

    /// Table receiving this diet's recipes
    pub table: String,

    /// JSON document with `add`, `eliminate` and `recipesToAvoid` lists
    #[serde(rename = "filter-path")]
    pub filter_path: PathBuf,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_page_load_timeout() -> u64 {
    15_000
}

fn default_failure_delay() -> u64 {
    500
}

fn default_user_agent() -> String {
    format!("diet-sieve/{}", env!("CARGO_PKG_VERSION"))
}

fn default_checkpoint_path() -> PathBuf {
    PathBuf::from("progress.txt")
}

fn default_failure_log_path() -> PathBuf {
    PathBuf::from("failed_urls.txt")
}

fn default_enabled() -> bool {
    true
}
