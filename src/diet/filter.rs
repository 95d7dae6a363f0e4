use crate::config::{Config, DietEntry};
use crate::ConfigError;
use serde_json::Value;

/// A named diet rule set
///
/// Keywords are stored lower-cased; every comparison is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DietFilter {
    name: String,
    table: String,
    add: Vec<String>,
    eliminate: Vec<String>,
    recipes_to_avoid: Vec<String>,
}

impl DietFilter {
    /// Builds a filter from explicit keyword lists
    pub fn new(
        name: impl Into<String>,
        table: impl Into<String>,
        add: Vec<String>,
        eliminate: Vec<String>,
        recipes_to_avoid: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            add: lowercase_all(add),
            eliminate: lowercase_all(eliminate),
            recipes_to_avoid: lowercase_all(recipes_to_avoid),
        }
    }

    /// Builds a filter from a parsed filter document
    ///
    /// `add`, `eliminate` and `recipesToAvoid` are optional. A missing field,
    /// or one that is not an array, becomes an empty list. Numbers and booleans
    /// are kept as their text; nulls and nested values are skipped.
    pub fn from_document(name: impl Into<String>, table: impl Into<String>, doc: &Value) -> Self {
        Self::new(
            name,
            table,
            read_list(doc, "add"),
            read_list(doc, "eliminate"),
            read_list(doc, "recipesToAvoid"),
        )
    }

    /// Reads the filter document named by a diet entry
    pub fn load(entry: &DietEntry) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(&entry.filter_path)?;
        let doc: Value =
            serde_json::from_str(&content).map_err(|source| ConfigError::FilterDocument {
                path: entry.filter_path.display().to_string(),
                source,
            })?;
        Ok(Self::from_document(&entry.name, &entry.table, &doc))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn add_list(&self) -> &[String] {
        &self.add
    }

    pub fn eliminate_list(&self) -> &[String] {
        &self.eliminate
    }

    pub fn recipes_to_avoid(&self) -> &[String] {
        &self.recipes_to_avoid
    }

    /// True if any `add` keyword occurs in the ingredients
    ///
    /// An empty `add` list never matches.
    pub fn includes_added_ingredients(&self, ingredients: &str) -> bool {
        let text = ingredients.to_lowercase();
        self.add.iter().any(|word| text.contains(word.as_str()))
    }

    /// True if no `eliminate` keyword occurs in the ingredients
    pub fn excludes_eliminated_ingredients(&self, ingredients: &str) -> bool {
        let text = ingredients.to_lowercase();
        !self.eliminate.iter().any(|word| text.contains(word.as_str()))
    }

    /// True if no tag equals one of the `recipesToAvoid` entries
    pub fn avoids_recipe_tags<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        let tags: Vec<String> = tags.iter().map(|t| t.as_ref().to_lowercase()).collect();
        !self.recipes_to_avoid.iter().any(|avoid| tags.contains(avoid))
    }

    /// All three predicates together
    pub fn matches<S: AsRef<str>>(&self, ingredients: &str, tags: &[S]) -> bool {
        self.includes_added_ingredients(ingredients)
            && self.excludes_eliminated_ingredients(ingredients)
            && self.avoids_recipe_tags(tags)
    }
}

/// Loads the filter of every enabled diet, in configuration order
pub fn load_diet_filters(config: &Config) -> Result<Vec<DietFilter>, ConfigError> {
    config.enabled_diets().map(DietFilter::load).collect()
}

fn read_list(doc: &Value, key: &str) -> Vec<String> {
    match doc.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn lowercase_all(words: Vec<String>) -> Vec<String> {
    words.into_iter().map(|w| w.to_lowercase()).collect()
}
