//! Link discovery
//!
//! Outgoing links come from `<a href>` elements only. Each href is resolved
//! against the page URL; pseudo-links and non-HTTP(S) targets are dropped.
//! Nothing here deduplicates or filters by domain: that happens in the
//! engine against the allow-list and the discovery buffer.

use scraper::{Html, Selector};
use url::Url;

/// Href prefixes that never point at a crawlable page
const PSEUDO_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Extracts absolute link targets from a page, in document order
///
/// # Arguments
///
/// * `html` - The page body
/// * `base_url` - The URL the page was fetched from
///
/// # Example
///
/// ```no_run
/// use polite_spider::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/b">B</a></body></html>"#;
/// let base = Url::parse("https://example.com/a").unwrap();
/// assert_eq!(extract_links(html, &base), vec!["https://example.com/b"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    links_in_document(&document, base_url)
}

/// Same as [`extract_links`] for an already parsed document
pub fn links_in_document(document: &Html, base_url: &Url) -> Vec<String> {
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves one href, or None when it should not be followed
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if PSEUDO_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}
