//! Run reporting
//!
//! This module handles:
//! - The [`RunSummary`] produced at the end of every run
//! - Plain-text and markdown renderings of a summary
//! - Delivery through [`ReportSink`] implementations (log, file, webhook)
//!
//! Delivery failures are returned to the caller, which logs them; they never
//! affect the persisted frontier.

mod markdown;
mod summary;
mod text;
mod webhook;

pub use markdown::{render_markdown, MarkdownFileSink};
pub use summary::RunSummary;
pub use text::{render_text, LogSink};
pub use webhook::WebhookSink;

use crate::config::OutputConfig;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// Errors that can occur while delivering a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{sink} rejected the report with HTTP {status}")]
    Rejected { sink: String, status: u16 },

    #[error("{failed} of {total} report sinks failed")]
    Partial { failed: usize, total: usize },
}

/// Destination for a finished run's summary
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Delivers the summary
    async fn deliver(&self, summary: &RunSummary) -> Result<(), ReportError>;
}

/// Fans a summary out to several sinks
///
/// Every sink is tried even when an earlier one fails; each failure is
/// logged with the sink's name.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn ReportSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn ReportSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl ReportSink for MultiSink {
    fn name(&self) -> &str {
        "multi"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), ReportError> {
        let mut failed = 0;
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(summary).await {
                tracing::error!("Report sink '{}' failed: {}", sink.name(), e);
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(ReportError::Partial {
                failed,
                total: self.sinks.len(),
            });
        }
        Ok(())
    }
}

/// Builds the sinks enabled by the output configuration
///
/// The log sink is always present; the markdown file and webhook sinks are
/// added when their settings are configured.
pub fn sinks_from_config(output: &OutputConfig, client: &Client) -> MultiSink {
    let mut sinks = MultiSink::new();
    sinks.push(Box::new(LogSink));

    if let Some(path) = &output.report_path {
        sinks.push(Box::new(MarkdownFileSink::new(path)));
    }
    if let Some(url) = &output.webhook_url {
        sinks.push(Box::new(WebhookSink::new(client.clone(), url)));
    }

    sinks
}
