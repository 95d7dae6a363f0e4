//! Recipe records and how they are read from a detail page
//!
//! - `Recipe`: the immutable record persisted per diet table
//! - `classify`: maps free-text tags onto food, cuisine and recipe categories
//! - `extract_cheap_fields` / `extract_recipe`: page readers

mod category;
mod extractor;

pub use category::{classify, Categories, CUISINE_CATEGORIES, FOOD_CATEGORIES, RECIPE_CATEGORIES};
pub use extractor::{
    extract_breadcrumbs, extract_cheap_fields, extract_nutrients, extract_recipe, CheapFields,
    RECIPE_HEADING_SELECTOR,
};

/// A recipe as stored in a diet table
///
/// `url` is the natural key; a table never holds two rows with the same url.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipe {
    pub name: String,
    pub recipe_category: String,
    pub food_category: String,
    pub prep_time: String,
    pub cook_time: String,
    pub ingredients: String,
    pub tags: Vec<String>,
    pub servings: String,
    pub cuisine_category: String,
    pub description: String,
    pub method: String,
    /// Flattened `"key: value, key: value"` nutrient table
    pub nutrients: String,
    pub url: String,
}

impl Recipe {
    /// Tags as written to the `tag` column
    pub fn joined_tags(&self) -> String {
        self.tags.join(", ")
    }
}
