//! Diet-Sieve: a resumable recipe crawler with diet filtering
//!
//! This crate walks a recipe site's listing pages in order, reads each recipe's
//! ingredients and tags, matches them against configurable diet filters and
//! stores matching recipes in one SQLite table per diet.

pub mod config;
pub mod crawler;
pub mod diet;
pub mod output;
pub mod progress;
pub mod recipe;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Diet-Sieve operations
#[derive(Debug, Error)]
pub enum SieveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Pagination error: {0}")]
    Pagination(String),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse filter document {path}: {source}")]
    FilterDocument {
        path: String,
        source: serde_json::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while fetching or reading a single page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Timed out loading {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Element '{selector}' never became visible on {url}")]
    NotVisible { url: String, selector: String },

    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),
}

impl FetchError {
    /// Short failure kind used in the failure log
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "Timeout",
            Self::HttpStatus { .. } => "HttpStatus",
            Self::Transport { .. } => "Transport",
            Self::NotVisible { .. } => "NotVisible",
            Self::InvalidUrl(_) => "InvalidUrl",
        }
    }
}

/// Result type alias for Diet-Sieve operations
pub type Result<T> = std::result::Result<T, SieveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub use config::Config;
pub use diet::DietFilter;
pub use recipe::{classify, Categories, Recipe};
pub use state::CrawlPhase;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_kinds() {
        let timeout = FetchError::Timeout {
            url: "https://example.com/r/1".to_string(),
        };
        assert_eq!(timeout.kind(), "Timeout");

        let status = FetchError::HttpStatus {
            url: "https://example.com/r/1".to_string(),
            status: 503,
        };
        assert_eq!(status.kind(), "HttpStatus");
        assert_eq!(status.to_string(), "HTTP 503 for https://example.com/r/1");

        assert_eq!(FetchError::InvalidUrl("nope".into()).kind(), "InvalidUrl");
    }
}
