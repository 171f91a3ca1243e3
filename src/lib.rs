//! Polite-Spider: a bounded, resumable web crawler
//!
//! Each invocation performs one bounded run: it pulls URLs from a persisted
//! frontier, gates them on an allow-list and per-host robots rules, fetches
//! and extracts the pages, discovers new links, and writes the frontier back
//! once at the end so the next invocation resumes where this one stopped.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod frontier;
pub mod report;
pub mod robots;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for fatal crawl failures
///
/// Per-URL failures (fetching, extraction) and report delivery failures never
/// surface here; they are recorded in the run summary or logged instead.
#[derive(Debug, Error)]
pub enum SpiderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frontier error: {0}")]
    Frontier(#[from] frontier::FrontierError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, SpiderError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::CrawlEngine;
pub use extract::{ContentExtractor, ExtractionMethod, HtmlExtractor, PageRecord};
pub use frontier::{Frontier, FrontierStore, VisitedSet};
pub use report::{ReportSink, RunSummary};
pub use robots::RobotsCache;
pub use url::{canonicalize, is_allowed_domain, CanonicalUrl};
