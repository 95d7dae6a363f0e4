//! Per-run counters

/// What happened to one recipe URL that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeOutcome {
    /// No diet filter matched; nothing was extracted or stored
    Skipped,

    /// At least one filter matched
    Matched {
        /// Diets that received a new row
        stored: Vec<String>,
        /// Diets whose table already had this url
        duplicates: Vec<String>,
    },
}

/// Summary of a finished crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Checkpoint the run started from
    pub start_page: u32,
    /// Listing pages reported by the site
    pub total_pages: u32,
    /// Listing pages whose links were all attempted
    pub pages_processed: u32,
    /// Listing pages that could not be read
    pub pages_skipped: u32,
    pub recipes_seen: u64,
    pub recipes_skipped: u64,
    pub recipes_matched: u64,
    /// New rows across all diet tables
    pub rows_stored: u64,
    pub duplicates: u64,
    pub failed: u64,
    pub retry_succeeded: u64,
    pub retry_failed: u64,
}

impl CrawlReport {
    /// Folds a successful recipe outcome into the counters
    pub fn record(&mut self, outcome: &RecipeOutcome) {
        match outcome {
            RecipeOutcome::Skipped => self.recipes_skipped += 1,
            RecipeOutcome::Matched { stored, duplicates } => {
                self.recipes_matched += 1;
                self.rows_stored += stored.len() as u64;
                self.duplicates += duplicates.len() as u64;
            }
        }
    }

    /// Emits the end-of-run summary
    pub fn log_summary(&self) {
        tracing::info!(
            "Pages: {} processed, {} skipped (started after page {}, {} total)",
            self.pages_processed,
            self.pages_skipped,
            self.start_page,
            self.total_pages
        );
        tracing::info!(
            "Recipes: {} seen, {} matched, {} skipped, {} failed",
            self.recipes_seen,
            self.recipes_matched,
            self.recipes_skipped,
            self.failed
        );
        tracing::info!(
            "Rows: {} stored, {} already present; retries: {} ok, {} failed",
            self.rows_stored,
            self.duplicates,
            self.retry_succeeded,
            self.retry_failed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_outcomes() {
        let mut report = CrawlReport::default();
        report.record(&RecipeOutcome::Skipped);
        report.record(&RecipeOutcome::Matched {
            stored: vec!["LF".into(), "LFV".into()],
            duplicates: vec!["LCHF".into()],
        });
        report.record(&RecipeOutcome::Matched {
            stored: vec![],
            duplicates: vec!["LF".into()],
        });

        assert_eq!(report.recipes_skipped, 1);
        assert_eq!(report.recipes_matched, 2);
        assert_eq!(report.rows_stored, 2);
        assert_eq!(report.duplicates, 2);
    }
}
