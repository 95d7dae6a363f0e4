//! Query access to a fetched page
//!
//! The crawl only needs a narrow capability set from a loaded page: the text
//! of the first element matching a selector, all matching elements, and an
//! element's attribute. Missing elements are reported as `None` or an empty
//! list, never as an error.

use crate::FetchError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// A fetched and parsed HTML page
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parses an HTML document fetched from `url`
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    /// The URL the page was loaded from
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Trimmed text of the first element matching `selector`
    pub fn find_one(&self, selector: &str) -> Option<String> {
        self.find_all(selector).first().map(element_text)
    }

    /// All elements matching `selector`, in document order
    pub fn find_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match parse_selector(selector) {
            Some(selector) => self.document.select(&selector).collect(),
            None => Vec::new(),
        }
    }

    /// Trimmed text of every element matching `selector`
    pub fn texts(&self, selector: &str) -> Vec<String> {
        self.find_all(selector).iter().map(element_text).collect()
    }

    /// Attribute value of an element
    pub fn attribute<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
        element.value().attr(name)
    }

    /// Fails unless an element matching `selector` is present
    ///
    /// Pages are static documents, so presence after load stands in for a
    /// visibility wait.
    pub fn require(&self, selector: &str) -> Result<(), FetchError> {
        if self.find_all(selector).is_empty() {
            return Err(FetchError::NotVisible {
                url: self.url.to_string(),
                selector: selector.to_string(),
            });
        }
        Ok(())
    }

    /// `href` values of matching links, resolved against the page URL
    ///
    /// Links that are empty, fragment-only or not http(s) are dropped.
    pub fn links(&self, selector: &str) -> Vec<String> {
        self.find_all(selector)
            .iter()
            .filter_map(|element| Self::attribute(element, "href"))
            .filter_map(|href| resolve_link(href, &self.url))
            .collect()
    }
}

/// Visible text of an element with whitespace runs collapsed
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Elements inside `element` matching `selector`
pub fn select_within<'a>(element: &ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match parse_selector(selector) {
        Some(selector) => element.select(&selector).collect(),
        None => Vec::new(),
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::debug!("Invalid selector '{}': {:?}", selector, e);
            None
        }
    }
}

fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
