//! Database schema definitions
//!
//! The `runs` table is fixed. Diet tables share one layout and are created on
//! demand, one per configured diet.

/// SQL schema for run tracking
pub const SCHEMA_SQL: &str = r#"
-- Track crawl runs
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    start_page INTEGER NOT NULL DEFAULT 0,
    last_page INTEGER
);
"#;

/// Columns written on insert, in bind order
pub const RECIPE_COLUMNS: &[&str] = &[
    "recipe_name",
    "recipe_category",
    "food_category",
    "ingredients",
    "preparation_time",
    "cooking_time",
    "tag",
    "no_of_servings",
    "cuisine_category",
    "recipe_description",
    "preparation_method",
    "nutrient_values",
    "recipe_url",
];

/// DDL for one diet table
///
/// `table` must already be a validated identifier.
pub fn diet_table_ddl(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (
            recipe_id INTEGER PRIMARY KEY AUTOINCREMENT,
            recipe_name TEXT,
            recipe_category TEXT,
            food_category TEXT,
            ingredients TEXT,
            preparation_time TEXT,
            cooking_time TEXT,
            tag TEXT,
            no_of_servings TEXT,
            cuisine_category TEXT,
            recipe_description TEXT,
            preparation_method TEXT,
            nutrient_values TEXT,
            recipe_url TEXT UNIQUE
        );"
    )
}

/// Parameterized insert for one diet table
pub fn insert_recipe_sql(table: &str) -> String {
    let placeholders = (1..=RECIPE_COLUMNS.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        RECIPE_COLUMNS.join(", "),
        placeholders
    )
}

/// Initializes the fixed part of the schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
