//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl run:
//! - Provisioning a table for every diet
//! - Walking listing pages from the checkpoint to the last page
//! - Filtering, extracting and storing each recipe
//! - Recording failures and retrying them once at the end
//! - Releasing the page session and storage exactly once
//!
//! Everything runs sequentially. The page session has shared navigation
//! state, and the diet tables assume a single writer.

use crate::config::Config;
use crate::crawler::listing::{listing_url, recipe_links, total_pages};
use crate::crawler::report::{CrawlReport, RecipeOutcome};
use crate::crawler::{HttpFetcher, Page, PageFetcher};
use crate::diet::{load_diet_filters, matching_filters, DietFilter};
use crate::progress::{FailedUrl, FailureLog, ProgressTracker};
use crate::recipe::{extract_cheap_fields, extract_recipe, RECIPE_HEADING_SELECTOR};
use crate::state::CrawlPhase;
use crate::storage::{open_storage, RunStatus, Storage, StorageError};
use crate::{ConfigError, FetchError, SieveError};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Why a single recipe could not be processed
#[derive(Debug, Error)]
pub enum RecipeFailure {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RecipeFailure {
    /// Failure kind written to the failure log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(e) => e.kind(),
            Self::Storage(_) => "Storage",
        }
    }
}

/// Run-level settings resolved from the configuration
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub root_url: Url,
    pub page_param: String,
    pub page_load_timeout: Duration,
    pub failure_delay: Duration,
    pub config_hash: String,
}

impl CrawlSettings {
    pub fn from_config(config: &Config, config_hash: impl Into<String>) -> Result<Self, ConfigError> {
        let root_url = Url::parse(&config.site.root_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root-url: {}", e)))?;

        Ok(Self {
            root_url,
            page_param: config.site.page_param.clone(),
            page_load_timeout: config.crawler.page_load_timeout(),
            failure_delay: config.crawler.failure_delay(),
            config_hash: config_hash.into(),
        })
    }
}

/// Main crawler coordinator structure
///
/// Owns the page session and the storage for the whole run.
pub struct Coordinator<F: PageFetcher, S: Storage> {
    settings: CrawlSettings,
    filters: Vec<DietFilter>,
    fetcher: F,
    storage: S,
    progress: ProgressTracker,
    failure_log: FailureLog,
    phase: CrawlPhase,
    failed: Vec<FailedUrl>,
    report: CrawlReport,
    run_id: Option<i64>,
    last_page: u32,
}

impl<F: PageFetcher, S: Storage> Coordinator<F, S> {
    pub fn new(
        settings: CrawlSettings,
        filters: Vec<DietFilter>,
        fetcher: F,
        storage: S,
        progress: ProgressTracker,
        failure_log: FailureLog,
    ) -> Self {
        Self {
            settings,
            filters,
            fetcher,
            storage,
            progress,
            failure_log,
            phase: CrawlPhase::Init,
            failed: Vec::new(),
            report: CrawlReport::default(),
            run_id: None,
            last_page: 0,
        }
    }

    /// Runs the crawl to completion
    ///
    /// The page session and storage are released before returning, whether
    /// the run succeeded or failed.
    pub async fn run(mut self) -> Result<CrawlReport, SieveError> {
        let outcome = self.drive().await;

        if let Err(e) = &outcome {
            tracing::error!("Crawl aborted during {}: {}", self.phase, e);
        }
        self.finish_run_record(outcome.is_ok());

        self.phase = CrawlPhase::Terminal;
        let report = self.report.clone();
        self.release();

        outcome.map(|()| {
            report.log_summary();
            report
        })
    }

    async fn drive(&mut self) -> Result<(), SieveError> {
        self.transition(CrawlPhase::Provisioning)?;
        for filter in &self.filters {
            self.storage.ensure_diet_table(filter.table())?;
            tracing::info!("Ensured table exists: {} ({})", filter.table(), filter.name());
        }

        let start_page = self.progress.read_checkpoint();
        self.last_page = start_page;
        self.report.start_page = start_page;
        self.run_id = Some(
            self.storage
                .create_run(&self.settings.config_hash, start_page)?,
        );

        let total = self.discover_total_pages().await?;
        self.report.total_pages = total;

        if start_page >= total {
            tracing::info!(
                "Checkpoint {} already covers all {} pages, nothing to crawl",
                start_page,
                total
            );
        } else {
            tracing::info!("Resuming at page {} of {}", start_page + 1, total);
        }

        for page in (start_page + 1)..=total {
            self.transition(CrawlPhase::Paginating)?;
            self.crawl_listing_page(page, total).await?;

            self.transition(CrawlPhase::PageDone)?;
            self.report.pages_processed += 1;
            self.last_page = page;
            if let Err(e) = self.progress.save_checkpoint(page) {
                tracing::error!(
                    "Failed to save checkpoint {} to {}: {}",
                    page,
                    self.progress.path().display(),
                    e
                );
            }
        }

        self.transition(CrawlPhase::Retrying)?;
        self.retry_failed().await;

        Ok(())
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), SieveError> {
        if !self.phase.can_transition_to(next) {
            return Err(SieveError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    /// Reads the last page number from the listing root
    async fn discover_total_pages(&mut self) -> Result<u32, SieveError> {
        let root = self.settings.root_url.to_string();
        let page = load_page(&mut self.fetcher, &root, self.settings.page_load_timeout).await?;

        total_pages(&page).ok_or_else(|| {
            SieveError::Pagination(format!("no pagination indicator found on {}", root))
        })
    }

    /// Attempts every recipe linked from one listing page
    async fn crawl_listing_page(&mut self, page: u32, total: u32) -> Result<(), SieveError> {
        tracing::info!("Processing page {} of {}", page, total);

        let url = listing_url(&self.settings.root_url, &self.settings.page_param, page);
        let links = match load_page(&mut self.fetcher, url.as_str(), self.settings.page_load_timeout)
            .await
        {
            Ok(listing) => recipe_links(&listing),
            Err(e) => {
                tracing::warn!("Skipping page {}: {}", page, e);
                self.report.pages_skipped += 1;
                return Ok(());
            }
        };

        if links.is_empty() {
            tracing::warn!("No recipe links found on page {}", page);
        }

        for link in links {
            self.transition(CrawlPhase::PerRecipe)?;
            self.handle_recipe(&link).await;
        }

        Ok(())
    }

    async fn handle_recipe(&mut self, url: &str) {
        self.report.recipes_seen += 1;

        let result = process_recipe(
            &mut self.fetcher,
            &mut self.storage,
            &self.filters,
            url,
            self.settings.page_load_timeout,
        )
        .await;

        match result {
            Ok(outcome) => self.report.record(&outcome),
            Err(failure) => {
                self.report.failed += 1;
                let failed = self.record_failure(url, &failure).await;
                if !self.failed.iter().any(|f| f.url == failed.url) {
                    self.failed.push(failed);
                }
            }
        }
    }

    /// Logs a failure to the console and the failure log, then pauses
    async fn record_failure(&mut self, url: &str, failure: &RecipeFailure) -> FailedUrl {
        tracing::warn!("Error: {} ({})", url, failure);

        let failed = FailedUrl::new(url, failure.kind(), failure.to_string());
        if let Err(e) = self.failure_log.append(&failed) {
            tracing::error!(
                "Failed to write to {}: {}",
                self.failure_log.path().display(),
                e
            );
        }

        if !self.settings.failure_delay.is_zero() {
            tokio::time::sleep(self.settings.failure_delay).await;
        }

        failed
    }

    /// Re-attempts each URL that failed during this run, once
    async fn retry_failed(&mut self) {
        let failed = std::mem::take(&mut self.failed);
        if failed.is_empty() {
            return;
        }

        tracing::info!("Retrying {} failed recipe(s)", failed.len());

        for failure in &failed {
            tracing::info!("Retrying: {}", failure.url);

            let result = process_recipe(
                &mut self.fetcher,
                &mut self.storage,
                &self.filters,
                &failure.url,
                self.settings.page_load_timeout,
            )
            .await;

            match result {
                Ok(outcome) => {
                    self.report.retry_succeeded += 1;
                    self.report.record(&outcome);
                }
                Err(e) => {
                    self.report.retry_failed += 1;
                    tracing::error!("Retry failed for: {}", failure.url);
                    self.record_failure(&failure.url, &e).await;
                }
            }
        }
    }

    fn finish_run_record(&mut self, succeeded: bool) {
        let Some(run_id) = self.run_id else {
            return;
        };

        let status = if succeeded {
            RunStatus::Completed
        } else {
            RunStatus::Failed
        };

        if let Err(e) = self.storage.finish_run(run_id, status, self.last_page) {
            tracing::warn!("Failed to record end of run {}: {}", run_id, e);
        }
    }

    fn release(self) {
        let Self {
            fetcher,
            storage,
            phase,
            ..
        } = self;
        debug_assert!(phase.is_terminal(), "released during {}", phase);

        fetcher.close();
        if let Err(e) = storage.close() {
            tracing::warn!("Failed to close storage cleanly: {}", e);
        }
        tracing::debug!("Released page session and storage");
    }
}

/// Loads a page, giving up after `limit`
pub async fn load_page<F: PageFetcher>(
    fetcher: &mut F,
    url: &str,
    limit: Duration,
) -> Result<Page, FetchError> {
    match tokio::time::timeout(limit, fetcher.fetch(url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
        }),
    }
}

/// Handles one recipe URL
///
/// Loads the detail page, checks the cheap fields against every filter and,
/// only when something matched, extracts the full record and inserts it into
/// each matching diet's table.
pub async fn process_recipe<F: PageFetcher, S: Storage>(
    fetcher: &mut F,
    storage: &mut S,
    filters: &[DietFilter],
    url: &str,
    limit: Duration,
) -> Result<RecipeOutcome, RecipeFailure> {
    let page = load_page(fetcher, url, limit).await?;
    page.require(RECIPE_HEADING_SELECTOR)?;

    let cheap = extract_cheap_fields(&page);
    let matched = matching_filters(filters, &cheap.ingredients, &cheap.tags);

    if matched.is_empty() {
        tracing::info!("Skipped (no matching filter): {}", url);
        return Ok(RecipeOutcome::Skipped);
    }

    let recipe = extract_recipe(&page, url, cheap);

    let mut stored = Vec::new();
    let mut duplicates = Vec::new();
    for filter in matched {
        if storage.insert_if_absent(filter.table(), &recipe)? {
            tracing::info!("Stored ({}): {}", filter.name(), recipe.name);
            stored.push(filter.name().to_string());
        } else {
            tracing::warn!(
                "Recipe already exists in table ({}): {}",
                filter.table(),
                recipe.url
            );
            duplicates.push(filter.name().to_string());
        }
    }

    Ok(RecipeOutcome::Matched { stored, duplicates })
}

/// Runs a complete crawl from a loaded configuration
///
/// Opening the page session or the database, and reading filter documents,
/// are fatal. With `fresh`, the checkpoint is reset first.
///
/// # Example
///
/// ```no_run
/// use diet_sieve::config::load_config_with_hash;
/// use diet_sieve::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (config, hash) = load_config_with_hash(Path::new("diet-sieve.toml"))?;
/// let report = run_crawl(&config, &hash, false).await?;
/// println!("{} rows stored", report.rows_stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: &Config,
    config_hash: &str,
    fresh: bool,
) -> Result<CrawlReport, SieveError> {
    let settings = CrawlSettings::from_config(config, config_hash)?;
    let filters = load_diet_filters(config)?;

    let progress = ProgressTracker::new(&config.progress.checkpoint_path);
    if fresh {
        progress.reset()?;
    }
    let failure_log = FailureLog::new(&config.progress.failure_log_path);

    let fetcher = HttpFetcher::new(&config.crawler)?;
    let storage = open_storage(&config.database.path)?;

    Coordinator::new(settings, filters, fetcher, storage, progress, failure_log)
        .run()
        .await
}
