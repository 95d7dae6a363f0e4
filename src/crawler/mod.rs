//! Crawler module for page loading and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - The page session abstraction and its HTTP implementation
//! - Listing page navigation
//! - Per-recipe filtering and persistence
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod listing;
mod page;
mod report;

pub use coordinator::{
    load_page, process_recipe, run_crawl, Coordinator, CrawlSettings, RecipeFailure,
};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use listing::{listing_url, recipe_links, total_pages};
pub use page::{element_text, select_within, Page};
pub use report::{CrawlReport, RecipeOutcome};
