//! Markdown report generation
//!
//! Renders a run summary as a markdown document and writes it to the
//! configured report path.

use crate::report::{ReportError, ReportSink, RunSummary};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};

/// Formats a run summary as markdown
///
/// # Arguments
///
/// * `summary` - The run summary
///
/// # Returns
///
/// A formatted markdown string
pub fn render_markdown(summary: &RunSummary) -> String {
    let mut md = String::new();

    md.push_str("# Polite-Spider Run Report\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Started**: {}\n", summary.started_at.to_rfc3339()));
    md.push_str(&format!(
        "- **Finished**: {}\n",
        summary.finished_at.to_rfc3339()
    ));
    md.push_str(&format!(
        "- **Duration**: {} seconds\n",
        summary.duration_seconds()
    ));
    if !summary.config_hash.is_empty() {
        md.push_str(&format!("- **Config Hash**: {}\n", summary.config_hash));
    }
    md.push('\n');

    md.push_str("## Statistics\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    md.push_str(&format!("| Pages fetched | {} |\n", summary.pages_fetched));
    md.push_str(&format!("| New links found | {} |\n", summary.links_found));
    md.push_str(&format!("| Failed fetches | {} |\n", summary.fetch_failures()));
    md.push_str(&format!("| Robots denied | {} |\n", summary.robots_denied));
    md.push_str(&format!("| Pending queue | {} |\n", summary.frontier_size));
    md.push_str(&format!("| Total visited | {} |\n\n", summary.visited_total));

    if !summary.failed_urls.is_empty() {
        md.push_str("## Failed URLs\n\n");
        for url in &summary.failed_urls {
            md.push_str(&format!("- {}\n", url));
        }
        md.push('\n');
    }

    if !summary.pages.is_empty() {
        md.push_str("## Pages\n\n");
        for page in &summary.pages {
            let heading = if page.title.is_empty() {
                page.url.as_str()
            } else {
                page.title.as_str()
            };
            md.push_str(&format!("### {}\n\n", heading));
            md.push_str(&format!("- **URL**: {}\n", page.url));
            if !page.meta_description.is_empty() {
                md.push_str(&format!("- **Description**: {}\n", page.meta_description));
            }
            for (key, value) in &page.structured {
                md.push_str(&format!("- **{}**: {}\n", key, value));
            }
            md.push_str(&format!(
                "- **Extraction**: {}\n\n",
                page.extraction_method
            ));
            if !page.main_text.is_empty() {
                md.push_str(&format!("> {}\n\n", page.main_text));
            }
        }
    }

    md.push_str("---\n\n");
    md.push_str("*Generated by Polite-Spider*\n");

    md
}

/// Writes the markdown report to a file, replacing any previous report
#[derive(Debug, Clone)]
pub struct MarkdownFileSink {
    path: PathBuf,
}

impl MarkdownFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ReportSink for MarkdownFileSink {
    fn name(&self) -> &str {
        "markdown"
    }

    async fn deliver(&self, summary: &RunSummary) -> Result<(), ReportError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, render_markdown(summary))?;
        tracing::info!("Wrote markdown report to {}", self.path.display());
        Ok(())
    }
}
