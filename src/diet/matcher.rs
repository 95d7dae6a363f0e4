use crate::diet::DietFilter;

/// Returns the filters whose predicates all pass, in configuration order
///
/// Only the cheap fields are needed. An empty result means the recipe is not
/// worth a full extraction.
pub fn matching_filters<'a, S: AsRef<str>>(
    filters: &'a [DietFilter],
    ingredients: &str,
    tags: &[S],
) -> Vec<&'a DietFilter> {
    filters
        .iter()
        .filter(|f| f.matches(ingredients, tags))
        .collect()
}
