//! Crawler module for page fetching and the run loop
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed identification header and timeout
//! - Link discovery from fetched HTML
//! - The bounded, resumable run loop

mod engine;
mod fetcher;
mod parser;

pub use engine::CrawlEngine;
pub use fetcher::{build_http_client, FetchError, Fetcher};
pub use parser::{extract_links, links_in_document};

use crate::config::Config;
use crate::report::RunSummary;
use crate::Result;

/// Runs one complete crawl with the default extractor and configured sinks
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
/// * `config_hash` - Hash of the configuration file, recorded in the summary
///
/// # Returns
///
/// * `Ok(RunSummary)` - The run completed and the frontier was persisted
/// * `Err(SpiderError)` - The frontier could not be loaded or saved
pub async fn run_crawl(config: Config, config_hash: &str) -> Result<RunSummary> {
    let mut engine = CrawlEngine::new(config)?.with_config_hash(config_hash);
    engine.run().await
}
