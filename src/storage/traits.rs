//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use crate::recipe::Recipe;
use crate::storage::{RunRecord, RunStatus};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid table name: {0}")]
    InvalidTable(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Access is strictly sequential: one crawl owns the storage for its whole
/// run and nothing else writes to the diet tables meanwhile. The check-then-
/// insert in `insert_if_absent` relies on that assumption rather than on a
/// transaction.
pub trait Storage {
    // ===== Diet Tables =====

    /// Creates a diet table unless it already exists
    fn ensure_diet_table(&mut self, table: &str) -> StorageResult<()>;

    /// Checks whether `table` already holds a row for `url`
    fn recipe_exists(&self, table: &str, url: &str) -> StorageResult<bool>;

    /// Inserts every recipe field into `table`
    fn insert_recipe(&mut self, table: &str, recipe: &Recipe) -> StorageResult<()>;

    /// Counts rows in a diet table
    fn count_recipes(&self, table: &str) -> StorageResult<u64>;

    /// Inserts the recipe unless its url is already stored in `table`
    ///
    /// # Returns
    ///
    /// `true` if a row was written, `false` if the url was already present
    fn insert_if_absent(&mut self, table: &str, recipe: &Recipe) -> StorageResult<bool> {
        if self.recipe_exists(table, &recipe.url)? {
            return Ok(false);
        }
        self.insert_recipe(table, recipe)?;
        Ok(true)
    }

    // ===== Run Management =====

    /// Records the start of a crawl run
    ///
    /// # Returns
    ///
    /// The ID of the newly created run
    fn create_run(&mut self, config_hash: &str, start_page: u32) -> StorageResult<i64>;

    /// Marks a run finished with its final status and last attempted page
    fn finish_run(&mut self, run_id: i64, status: RunStatus, last_page: u32)
        -> StorageResult<()>;

    /// Gets a run by ID
    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Lifecycle =====

    /// Releases the underlying connection
    fn close(self) -> StorageResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}
