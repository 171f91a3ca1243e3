//! Plain-text report rendering and the log sink

use crate::extract::PageRecord;
use crate::report::{ReportError, ReportSink, RunSummary};
use async_trait::async_trait;

/// Renders a summary as a plain-text report
///
/// Run counters come first, followed by one block per fetched page.
pub fn render_text(summary: &RunSummary) -> String {
    let mut lines = vec![
        "Polite-Spider run report".to_string(),
        format!(
            "Finished at: {}",
            summary.finished_at.format("%Y-%m-%d %H:%M:%S")
        ),
        format!("Pages fetched: {}", summary.pages_fetched),
        format!("New links found: {}", summary.links_found),
        format!("Failed URLs: {}", summary.fetch_failures()),
        format!("Pending queue length: {}", summary.frontier_size),
        format!("Total visited: {}", summary.visited_total),
        String::new(),
        "=".repeat(60),
        "Pages fetched this run:".to_string(),
    ];

    for (idx, page) in summary.pages.iter().enumerate() {
        lines.push(format!("\n--- Page {} ---", idx + 1));
        page_lines(page, &mut lines);
    }

    lines.join("\n")
}

fn page_lines(page: &PageRecord, lines: &mut Vec<String>) {
    lines.push(format!("Title: {}", page.title));
    lines.push(format!("URL: {}", page.url));
    lines.push(format!("Description: {}", page.meta_description));

    let mut social = Vec::new();
    if let Some(title) = page.social.get("title").filter(|t| **t != page.title) {
        social.push(format!("OG title: {}", title));
    }
    if let Some(description) = page.social.get("description") {
        social.push(format!("OG description: {}", description));
    }
    if let Some(image) = page.social.get("image") {
        social.push(format!("OG image: {}", image));
    }
    if !social.is_empty() {
        lines.push("Social metadata:".to_string());
        lines.extend(social);
    }

    let structured = &page.structured;
    let mut items = Vec::new();
    if let Some(name) = structured.get("name") {
        items.push(format!("Name: {}", name));
    }
    if let Some(price) = structured.get("price") {
        match structured.get("currency") {
            Some(currency) => items.push(format!("Price: {} {}", price, currency)),
            None => items.push(format!("Price: {}", price)),
        }
    }
    if let Some(rating) = structured.get("rating") {
        items.push(format!("Rating: {}", rating));
    }
    if let Some(count) = structured.get("review_count") {
        items.push(format!("Reviews: {}", count));
    }
    if !items.is_empty() {
        lines.push("Structured data:".to_string());
        lines.extend(items);
    }

    lines.push(format!(
        "Text preview (method: {}):",
        page.extraction_method
    ));
    lines.push(page.main_text.clone());
}

/// Writes the plain-text report to the log
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl ReportSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), ReportError> {
        tracing::info!("{}", render_text(summary));
        Ok(())
    }
}
