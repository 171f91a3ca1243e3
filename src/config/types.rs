use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Polite-Spider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub domains: DomainsConfig,
    #[serde(default)]
    pub frontier: FrontierConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Per-run crawl parameters
///
/// All values are fixed for the duration of a run.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of fetch attempts per run
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Delay after every fetch attempt (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Hard timeout for a single request (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Scheme used to retrieve robots.txt ("https" or "http")
    #[serde(rename = "robots-scheme", default = "default_robots_scheme")]
    pub robots_scheme: String,

    /// Whether an unreachable robots.txt allows (true) or denies (false) the host
    #[serde(rename = "robots-fail-open", default = "default_true")]
    pub robots_fail_open: bool,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            request_delay_ms: default_request_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            robots_scheme: default_robots_scheme(),
            robots_fail_open: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used as the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Full identification header sent with every request
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }

    /// Product token matched against `User-agent` lines in robots.txt
    pub fn robots_token(&self) -> &str {
        &self.crawler_name
    }
}

/// Domain allow-list
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainsConfig {
    /// Ordered host suffixes; empty means unrestricted
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// Locations of the persisted frontier and the seed list
#[derive(Debug, Clone, Deserialize)]
pub struct FrontierConfig {
    #[serde(rename = "visited-path", default = "default_visited_path")]
    pub visited_path: PathBuf,

    #[serde(rename = "pending-path", default = "default_pending_path")]
    pub pending_path: PathBuf,

    #[serde(rename = "seeds-path", default = "default_seeds_path")]
    pub seeds_path: PathBuf,
}

impl Default for FrontierConfig {
    fn default() -> Self {
        Self {
            visited_path: default_visited_path(),
            pending_path: default_pending_path(),
            seeds_path: default_seeds_path(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory for raw HTML snapshots (disabled when absent)
    #[serde(rename = "data-dir", default)]
    pub data_dir: Option<PathBuf>,

    /// Path to the markdown report file (disabled when absent)
    #[serde(rename = "report-path", default)]
    pub report_path: Option<PathBuf>,

    /// Endpoint receiving the run summary as JSON (disabled when absent)
    #[serde(rename = "webhook-url", default)]
    pub webhook_url: Option<String>,

    /// Maximum number of characters of main text kept per page
    #[serde(rename = "preview-max-length", default = "default_preview_max_length")]
    pub preview_max_length: usize,

    /// Deliver a report even when the run fetched no pages
    #[serde(rename = "report-empty-runs", default)]
    pub report_empty_runs: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            report_path: None,
            webhook_url: None,
            preview_max_length: default_preview_max_length(),
            report_empty_runs: false,
        }
    }
}

fn default_max_pages() -> u32 {
    15
}

fn default_request_delay_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_robots_scheme() -> String {
    "https".to_string()
}

fn default_true() -> bool {
    true
}

fn default_visited_path() -> PathBuf {
    PathBuf::from("visited.txt")
}

fn default_pending_path() -> PathBuf {
    PathBuf::from("pending.txt")
}

fn default_seeds_path() -> PathBuf {
    PathBuf::from("seeds.txt")
}

fn default_preview_max_length() -> usize {
    2000
}
