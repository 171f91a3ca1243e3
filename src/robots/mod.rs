//! Robots.txt handling module
//!
//! This module provides per-host retrieval, parsing and caching of robots.txt
//! files, and answers allow/deny queries for individual URLs.

mod cache;
mod parser;

pub use cache::RobotsCache;
pub use parser::RobotsPolicy;

use thiserror::Error;

/// Reasons a robots.txt file could not be retrieved
///
/// These never propagate out of the cache; they select the degraded policy.
#[derive(Debug, Error)]
pub enum RobotsError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}
