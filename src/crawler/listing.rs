//! Listing page navigation
//!
//! Listing pages are numbered from 1. The last page number is read from the
//! pagination bar: it is the item right before "Next".

use crate::crawler::{element_text, select_within, Page};
use scraper::ElementRef;
use url::Url;

const PAGE_ITEM_SELECTOR: &str = "li.page-item";
const RECIPE_LINK_SELECTOR: &str = "div[class*='recipe-list'] h5 a";

/// URL of listing page `page`
pub fn listing_url(root: &Url, page_param: &str, page: u32) -> Url {
    let mut url = root.clone();
    url.query_pairs_mut()
        .append_pair(page_param, &page.to_string());
    url
}

/// Total listing pages, if the pagination bar can be read
pub fn total_pages(page: &Page) -> Option<u32> {
    let next_item = page
        .find_all(PAGE_ITEM_SELECTOR)
        .into_iter()
        .find(|item| {
            select_within(item, "a")
                .iter()
                .any(|link| element_text(link) == "Next")
        })?;

    let previous = next_item
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == "li")?;

    select_within(&previous, "a")
        .first()
        .and_then(|link| element_text(link).parse().ok())
}

/// Recipe detail URLs on a listing page, in the order shown
pub fn recipe_links(page: &Page) -> Vec<String> {
    page.links(RECIPE_LINK_SELECTOR)
}
