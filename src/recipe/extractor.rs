//! Reads recipe fields from a loaded detail page
//!
//! Extraction happens in two steps. The cheap fields (ingredients and tags)
//! are enough to run the diet filters; the full record is read only when at
//! least one filter matched. Any missing element yields an empty value.

use crate::crawler::{element_text, select_within, Page};
use crate::recipe::{classify, Recipe};
use scraper::ElementRef;

/// Present on every rendered recipe page
pub const RECIPE_HEADING_SELECTOR: &str = "h4.rec-heading";

const NAME_SELECTOR: &str = "h4.rec-heading span";
const INGREDIENTS_SELECTOR: &str = "#ingredients";
const TAGS_SELECTOR: &str = "ul.tags-list li a";
const METHOD_SELECTOR: &str = "#methods";
const DESCRIPTION_SELECTOR: &str = "#aboutrecipe p";
const NUTRIENT_ROWS_SELECTOR: &str = "table#rcpnutrients tr";
const BREADCRUMB_MARKER: &str = "You are here";

const PREP_TIME_LABEL: &str = "Preparation Time";
const COOK_TIME_LABEL: &str = "Cooking Time";
const SERVINGS_LABEL: &str = "Makes";

/// Fields needed to decide whether a recipe matches any diet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheapFields {
    pub ingredients: String,
    pub tags: Vec<String>,
}

/// Reads ingredients text and tag list
pub fn extract_cheap_fields(page: &Page) -> CheapFields {
    CheapFields {
        ingredients: page.find_one(INGREDIENTS_SELECTOR).unwrap_or_default(),
        tags: page.texts(TAGS_SELECTOR),
    }
}

/// Reads the full recipe record
///
/// Categories come from the page tags followed by the breadcrumb trail, so a
/// breadcrumb match overrides a tag match in the same dimension.
pub fn extract_recipe(page: &Page, url: &str, cheap: CheapFields) -> Recipe {
    let mut category_input = cheap.tags.clone();
    category_input.extend(extract_breadcrumbs(page));
    let categories = classify(&category_input);

    Recipe {
        name: page.find_one(NAME_SELECTOR).unwrap_or_default(),
        recipe_category: categories.recipe,
        food_category: categories.food,
        prep_time: labelled_value(page, PREP_TIME_LABEL),
        cook_time: labelled_value(page, COOK_TIME_LABEL),
        ingredients: cheap.ingredients,
        tags: cheap.tags,
        servings: labelled_value(page, SERVINGS_LABEL),
        cuisine_category: categories.cuisine,
        description: page.find_one(DESCRIPTION_SELECTOR).unwrap_or_default(),
        method: page.find_one(METHOD_SELECTOR).unwrap_or_default(),
        nutrients: extract_nutrients(page),
        url: url.to_string(),
    }
}

/// Texts of the "You are here" trail: its links, then each span's first
/// link (or the span's own text)
pub fn extract_breadcrumbs(page: &Page) -> Vec<String> {
    let container = page
        .find_all("p")
        .into_iter()
        .find(|p| element_text(p).contains(BREADCRUMB_MARKER));

    let Some(container) = container else {
        return Vec::new();
    };

    let mut crumbs: Vec<String> = select_within(&container, "a")
        .iter()
        .map(element_text)
        .collect();

    for span in select_within(&container, "span") {
        match select_within(&span, "a").first() {
            Some(link) => crumbs.push(element_text(link)),
            None => crumbs.push(element_text(&span)),
        }
    }

    crumbs
}

/// Two-column nutrient rows as `"name: value, name: value"`
pub fn extract_nutrients(page: &Page) -> String {
    page.find_all(NUTRIENT_ROWS_SELECTOR)
        .iter()
        .filter_map(|row| {
            let cells = select_within(row, "td");
            match cells.as_slice() {
                [key, value] => Some(format!("{}: {}", element_text(key), element_text(value))),
                _ => None,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Value printed under an `h6` label, e.g. "Preparation Time" -> "10 mins"
fn labelled_value(page: &Page, label: &str) -> String {
    page.find_all("h6")
        .into_iter()
        .filter(|h6| element_text(h6).contains(label))
        .find_map(|h6| strong_after(&h6))
        .unwrap_or_default()
}

/// Text of the first `strong` inside any `p` sibling following `element`
fn strong_after(element: &ElementRef<'_>) -> Option<String> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|sibling| sibling.value().name() == "p")
        .find_map(|p| select_within(&p, "strong").first().map(element_text))
}
