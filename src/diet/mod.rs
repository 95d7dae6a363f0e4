//! Diet filters and the filter-match engine
//!
//! A diet filter is plain data: a diet name, the table its recipes go to, and
//! three keyword lists read from a JSON document. Every variant shares the
//! same predicates.

mod filter;
mod matcher;

pub use filter::{load_diet_filters, DietFilter};
pub use matcher::matching_filters;
