//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::config::validate_table_name;
use crate::recipe::Recipe;
use crate::storage::schema::{diet_table_ddl, initialize_schema, insert_recipe_sql};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn checked_table(table: &str) -> StorageResult<&str> {
    validate_table_name(table).map_err(|_| StorageError::InvalidTable(table.to_string()))?;
    Ok(table)
}

fn read_run(row: &rusqlite::Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?).unwrap_or(RunStatus::Failed),
        start_page: row.get(5)?,
        last_page: row.get(6)?,
    })
}

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status, start_page, last_page";

impl Storage for SqliteStorage {
    // ===== Diet Tables =====

    fn ensure_diet_table(&mut self, table: &str) -> StorageResult<()> {
        let table = checked_table(table)?;
        self.conn.execute_batch(&diet_table_ddl(table))?;
        tracing::debug!("Ensured table exists: {}", table);
        Ok(())
    }

    fn recipe_exists(&self, table: &str, url: &str) -> StorageResult<bool> {
        let table = checked_table(table)?;
        let found: Option<i64> = self
            .conn
            .query_row(
                &format!("SELECT 1 FROM {} WHERE recipe_url = ?1", table),
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn insert_recipe(&mut self, table: &str, recipe: &Recipe) -> StorageResult<()> {
        let table = checked_table(table)?;
        self.conn.execute(
            &insert_recipe_sql(table),
            params![
                recipe.name,
                recipe.recipe_category,
                recipe.food_category,
                recipe.ingredients,
                recipe.prep_time,
                recipe.cook_time,
                recipe.joined_tags(),
                recipe.servings,
                recipe.cuisine_category,
                recipe.description,
                recipe.method,
                recipe.nutrients,
                recipe.url,
            ],
        )?;
        Ok(())
    }

    fn count_recipes(&self, table: &str) -> StorageResult<u64> {
        let table = checked_table(table)?;
        let count: i64 =
            self.conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
        Ok(count as u64)
    }

    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str, start_page: u32) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status, start_page) VALUES (?1, ?2, ?3, ?4)",
            params![now, config_hash, RunStatus::Running.to_db_string(), start_page],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        last_page: u32,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, last_page = ?3 WHERE id = ?4",
            params![status.to_db_string(), now, last_page, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS),
                params![run_id],
                read_run,
            )
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let run = self
            .conn
            .query_row(
                &format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS),
                [],
                read_run,
            )
            .optional()?;
        Ok(run)
    }

    // ===== Lifecycle =====

    fn close(self) -> StorageResult<()> {
        self.conn.close().map_err(|(_, e)| StorageError::Sqlite(e))
    }
}
