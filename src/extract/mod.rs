//! Page content extraction
//!
//! The crawl engine treats extraction as a black box behind the
//! [`ContentExtractor`] trait: raw HTML in, [`PageRecord`] out, never an error.
//! [`HtmlExtractor`] is the default implementation built on `scraper`.

mod metadata;
mod structured;
mod text;

pub use metadata::{extract_description, extract_social, extract_title};
pub use structured::extract_structured;
pub use text::{extract_main_text, truncate_preview};

use scraper::Html;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// How the main text of a page was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Text of the page's `<article>` / `<main>` content region
    Article,
    /// Visible body text with scripts and styles removed
    Fallback,
    /// No text could be extracted
    None,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Article => "article",
            Self::Fallback => "fallback",
            Self::None => "none",
        };
        f.write_str(name)
    }
}

/// Structured result of extracting one fetched page
///
/// Missing information is represented by empty strings and maps, never by an
/// error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    /// Open Graph properties keyed without the `og:` prefix
    pub social: BTreeMap<String, String>,
    /// Summary of embedded structured data (name, price, rating, ...)
    pub structured: BTreeMap<String, String>,
    /// Main text, bounded to the configured preview length
    pub main_text: String,
    pub extraction_method: ExtractionMethod,
}

impl PageRecord {
    /// A record with every field empty
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: String::new(),
            meta_description: String::new(),
            social: BTreeMap::new(),
            structured: BTreeMap::new(),
            main_text: String::new(),
            extraction_method: ExtractionMethod::None,
        }
    }
}

/// Turns raw HTML into a page record
///
/// Implementations must not panic or fail on any input; unusable input
/// degrades to empty fields.
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, html: &str, url: &str) -> PageRecord;
}

/// Default extractor based on `scraper` selectors and `serde_json` for JSON-LD
#[derive(Debug, Clone)]
pub struct HtmlExtractor {
    preview_max_length: usize,
}

impl HtmlExtractor {
    pub fn new(preview_max_length: usize) -> Self {
        Self { preview_max_length }
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new(2000)
    }
}

impl ContentExtractor for HtmlExtractor {
    fn extract(&self, html: &str, url: &str) -> PageRecord {
        let document = Html::parse_document(html);
        let (main_text, extraction_method) = extract_main_text(&document);

        PageRecord {
            url: url.to_string(),
            title: extract_title(&document).unwrap_or_default(),
            meta_description: extract_description(&document).unwrap_or_default(),
            social: extract_social(&document),
            structured: extract_structured(&document),
            main_text: truncate_preview(&main_text, self.preview_max_length),
            extraction_method,
        }
    }
}
