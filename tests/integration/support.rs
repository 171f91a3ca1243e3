//! Shared fixtures for the integration tests

use async_trait::async_trait;
use polite_spider::config::{parse_config, Config};
use polite_spider::report::{ReportError, ReportSink, RunSummary};
use polite_spider::CrawlEngine;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A mock site plus a private state directory
pub struct TestSite {
    pub server: MockServer,
    pub dir: TempDir,
}

impl TestSite {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Absolute URL of `path` on the mock server
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    pub fn state_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_seeds(&self, seeds: &[String]) {
        write_lines(&self.state_path("seeds.txt"), seeds);
    }

    pub fn write_pending(&self, pending: &[String]) {
        write_lines(&self.state_path("pending.txt"), pending);
    }

    pub fn visited(&self) -> Vec<String> {
        read_lines(&self.state_path("visited.txt"))
    }

    pub fn pending(&self) -> Vec<String> {
        read_lines(&self.state_path("pending.txt"))
    }

    /// Configuration restricted to the mock server's host, without delays
    pub fn config(&self, max_pages: u32) -> Config {
        self.config_with_delay(max_pages, 0)
    }

    /// Configuration restricted to the mock server's host
    pub fn config_with_delay(&self, max_pages: u32, delay_ms: u64) -> Config {
        let toml = format!(
            r#"
[crawler]
max-pages = {max_pages}
request-delay-ms = {delay_ms}
request-timeout-secs = 2
robots-scheme = "http"

[user-agent]
crawler-name = "TestSpider"
crawler-version = "1.0"
contact-url = "https://example.com/about"

[domains]
allowed = ["127.0.0.1"]

[frontier]
visited-path = "{visited}"
pending-path = "{pending}"
seeds-path = "{seeds}"
"#,
            max_pages = max_pages,
            delay_ms = delay_ms,
            visited = self.state_path("visited.txt").display(),
            pending = self.state_path("pending.txt").display(),
            seeds = self.state_path("seeds.txt").display(),
        );
        parse_config(&toml).expect("Test config should be valid")
    }

    /// Engine for this site whose reports are captured by `sink`
    pub fn engine(&self, max_pages: u32, sink: &RecordingSink) -> CrawlEngine {
        CrawlEngine::new(self.config(max_pages))
            .expect("Failed to build engine")
            .with_sink(Box::new(sink.clone()))
    }

    pub async fn mount_robots(&self, body: &str) {
        Mock::given(method("GET"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Serves `html` at `page_path`, expecting exactly `hits` requests
    pub async fn mount_page(&self, page_path: &str, html: String, hits: u64) {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(html)
                    .insert_header("content-type", "text/html"),
            )
            .expect(hits)
            .mount(&self.server)
            .await;
    }
}

/// Report sink that keeps every delivered summary
#[derive(Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<RunSummary>>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl ReportSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), ReportError> {
        self.delivered.lock().unwrap().push(summary.clone());
        Ok(())
    }
}

/// Report sink that always fails
pub struct FailingSink;

#[async_trait]
impl ReportSink for FailingSink {
    fn name(&self) -> &str {
        "failing"
    }

    async fn deliver(&self, _summary: &RunSummary) -> Result<(), ReportError> {
        Err(ReportError::Rejected {
            sink: "failing".to_string(),
            status: 503,
        })
    }
}

/// Minimal HTML page with the given title and links
pub fn page(title: &str, links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><article><p>{} body</p>{}</article></body></html>",
        title, title, anchors
    )
}

fn write_lines(path: &std::path::Path, lines: &[String]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(path, content).expect("Failed to write state file");
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}
