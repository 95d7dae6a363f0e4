//! Tag-to-category heuristic
//!
//! Each vocabulary is scanned in declared order and the first entry contained
//! in a normalized tag wins for that tag. Entries that contain another entry
//! ("Non-veg" contains "veg", "South Indian" contains "indian") are declared
//! before it so canonical names classify as themselves.
//!
//! Across tags the LAST matching tag sets each dimension, so later tags
//! (breadcrumbs, when appended after page tags) override earlier ones.

pub const FOOD_CATEGORIES: &[&str] = &[
    "Vegan",
    "Vegetarian",
    "Non-veg",
    "Veg",
    "Jain",
    "Eggitarian",
];

pub const CUISINE_CATEGORIES: &[&str] = &[
    "South Indian",
    "North Indian",
    "Indian",
    "Punjabi",
    "Gujarati",
    "Tamil nadu",
    "Bengali",
    "Maharashtrian",
    "Kashmiri",
    "Andhra",
    "Kerala",
    "Goan",
    "Karnataka",
    "Rajasthani",
    "Sindhi",
    "Awadhi",
    "Bihari",
    "Uttar pradesh",
    "Delhi",
    "Assamese",
    "Manipuri",
    "Tripuri",
    "Sikkimese",
    "Mizo",
    "Arunachali",
    "Chhattisgarhi",
    "Madhya pradesh",
    "Haryanvi",
    "Uttarakhand",
];

pub const RECIPE_CATEGORIES: &[&str] = &["Breakfast", "Lunch", "Dinner", "Snack"];

/// Category values for one recipe; empty when nothing matched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    pub food: String,
    pub cuisine: String,
    pub recipe: String,
}

/// Classifies tags into food, cuisine and recipe categories
///
/// # Example
///
/// ```
/// use diet_sieve::recipe::classify;
///
/// let categories = classify(&["Vegan", "Non-veg"]);
/// assert_eq!(categories.food, "Non-veg");
/// assert_eq!(categories.cuisine, "");
/// ```
pub fn classify<S: AsRef<str>>(tags: &[S]) -> Categories {
    let mut categories = Categories::default();

    for tag in tags {
        let normalized = tag.as_ref().trim().to_lowercase();

        if let Some(food) = first_contained(FOOD_CATEGORIES, &normalized) {
            categories.food = food.to_string();
        }
        if let Some(cuisine) = first_contained(CUISINE_CATEGORIES, &normalized) {
            categories.cuisine = cuisine.to_string();
        }
        if let Some(recipe) = first_contained(RECIPE_CATEGORIES, &normalized) {
            categories.recipe = recipe.to_string();
        }
    }

    categories
}

fn first_contained(vocabulary: &[&'static str], normalized: &str) -> Option<&'static str> {
    vocabulary
        .iter()
        .copied()
        .find(|entry| normalized.contains(entry.to_lowercase().as_str()))
}
