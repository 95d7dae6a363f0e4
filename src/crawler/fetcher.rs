//! Page fetching
//!
//! The crawl talks to the site through `PageFetcher`, a single browsing
//! session that loads one page at a time. `HttpFetcher` is the production
//! implementation built on `reqwest`.

use crate::config::CrawlerConfig;
use crate::crawler::Page;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// A page-loading session
///
/// Sessions carry navigation state and are used strictly sequentially.
#[allow(async_fn_in_trait)]
pub trait PageFetcher {
    /// Loads `url` and returns the parsed page
    async fn fetch(&mut self, url: &str) -> Result<Page, FetchError>;

    /// Ends the session
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use diet_sieve::config::CrawlerConfig;
/// use diet_sieve::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.page_load_timeout())
        .connect_timeout(Duration::from_secs(10).min(config.page_load_timeout()))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `reqwest`-backed page session
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(|e| FetchError::Transport {
            url: String::new(),
            message: format!("failed to build HTTP client: {}", e),
        })?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> Result<Page, FetchError> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(Page::parse(final_url, &body))
    }
}

fn classify_error(url: &str, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}
