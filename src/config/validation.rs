use crate::config::types::{Config, CrawlerConfig, DatabaseConfig, DietEntry, SiteConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_crawler_config(&config.crawler)?;
    validate_database_config(&config.database)?;
    validate_diets(&config.diets)?;
    Ok(())
}

/// Validates the target site
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.root_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "root-url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if config.page_param.trim().is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawler timings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.page_load_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "page-load-timeout-ms must be >= 100ms, got {}ms",
            config.page_load_timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates diet entries: at least one enabled, unique names and tables
fn validate_diets(diets: &[DietEntry]) -> Result<(), ConfigError> {
    if !diets.iter().any(|d| d.enabled) {
        return Err(ConfigError::Validation(
            "at least one enabled [[diet]] entry is required".to_string(),
        ));
    }

    let mut names = HashSet::new();
    let mut tables = HashSet::new();

    for entry in diets {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "diet name cannot be empty".to_string(),
            ));
        }

        validate_table_name(&entry.table)?;

        if !names.insert(entry.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate diet name '{}'",
                entry.name
            )));
        }

        if !tables.insert(entry.table.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate diet table '{}'",
                entry.table
            )));
        }
    }

    Ok(())
}

/// Table names end up inside DDL and DML, so only plain identifiers pass
pub(crate) fn validate_table_name(table: &str) -> Result<(), ConfigError> {
    let mut chars = table.chars();

    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if !valid_start || !valid_rest {
        return Err(ConfigError::Validation(format!(
            "table name '{}' must match [a-z_][a-z0-9_]*",
            table
        )));
    }

    Ok(())
}
