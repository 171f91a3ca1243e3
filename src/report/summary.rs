//! Run summary type

use crate::extract::PageRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Outcome of one crawl run
///
/// Produced once per run after the frontier has been persisted.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Hash of the configuration file the run was started with (may be empty)
    pub config_hash: String,

    /// Pages successfully fetched this run
    pub pages_fetched: usize,

    /// New URLs added to the discovery buffer this run
    pub links_found: usize,

    /// URLs whose fetch failed this run, in attempt order
    pub failed_urls: Vec<String>,

    /// URLs skipped because robots rules disallowed them
    pub robots_denied: usize,

    /// Pending queue length after the final merge
    pub frontier_size: usize,

    /// Cumulative visited count across all runs
    pub visited_total: usize,

    /// Extracted records of this run's fetched pages, in fetch order
    pub pages: Vec<PageRecord>,
}

impl RunSummary {
    /// Creates an empty summary for a run that started at `started_at`
    pub fn new(started_at: DateTime<Utc>, config_hash: impl Into<String>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            config_hash: config_hash.into(),
            pages_fetched: 0,
            links_found: 0,
            failed_urls: Vec::new(),
            robots_denied: 0,
            frontier_size: 0,
            visited_total: 0,
            pages: Vec::new(),
        }
    }

    pub fn fetch_failures(&self) -> usize {
        self.failed_urls.len()
    }

    /// Total fetch attempts (successes and failures)
    pub fn fetch_attempts(&self) -> usize {
        self.pages_fetched + self.failed_urls.len()
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Whether the run produced any page content worth reporting
    pub fn has_content(&self) -> bool {
        !self.pages.is_empty()
    }
}
