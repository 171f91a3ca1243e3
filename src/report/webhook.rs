//! Webhook delivery

use crate::report::{render_text, ReportError, ReportSink, RunSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

/// Request body posted to the webhook
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    subject: String,
    text: String,
    summary: &'a RunSummary,
}

/// POSTs the summary as JSON to a configured URL
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ReportSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), ReportError> {
        let payload = WebhookPayload {
            subject: format!("Polite-Spider report - {} pages", summary.pages_fetched),
            text: render_text(summary),
            summary,
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Rejected {
                sink: self.name().to_string(),
                status: status.as_u16(),
            });
        }

        tracing::info!("Delivered report to webhook {}", self.url);
        Ok(())
    }
}
