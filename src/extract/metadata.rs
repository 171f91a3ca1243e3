//! Title, meta description and Open Graph extraction

use scraper::{Html, Selector};
use std::collections::BTreeMap;

/// Extracts the trimmed `<title>` text
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the meta description, falling back to `og:description`
pub fn extract_description(document: &Html) -> Option<String> {
    ["meta[name='description']", "meta[property='og:description']"]
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .filter_map(|element| element.value().attr("content"))
                .map(str::trim)
                .find(|content| !content.is_empty())
                .map(str::to_string)
        })
}

/// Extracts every `og:*` property with non-empty content, keyed without the prefix
///
/// When a property repeats, the last occurrence wins.
pub fn extract_social(document: &Html) -> BTreeMap<String, String> {
    let mut social = BTreeMap::new();

    let selector = match Selector::parse("meta[property^='og:']") {
        Ok(selector) => selector,
        Err(_) => return social,
    };

    for element in document.select(&selector) {
        let property = element.value().attr("property").unwrap_or_default();
        let content = element.value().attr("content").unwrap_or_default().trim();
        if let Some(key) = property.strip_prefix("og:") {
            if !key.is_empty() && !content.is_empty() {
                social.insert(key.to_string(), content.to_string());
            }
        }
    }

    social
}
