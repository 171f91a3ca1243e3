//! Main text extraction

use crate::extract::ExtractionMethod;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text is never part of the readable content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Content regions tried in order before falling back to the whole body
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role='main']"];

/// Extracts the page's readable text and reports how it was found
///
/// The first content region with any text wins (`Article`). Otherwise the
/// visible text of the body is used (`Fallback`). A page with no text at all
/// yields an empty string and `None`.
pub fn extract_main_text(document: &Html) -> (String, ExtractionMethod) {
    for selector in CONTENT_SELECTORS.iter().filter_map(|s| Selector::parse(s).ok()) {
        let text = document
            .select(&selector)
            .map(visible_text)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        if !text.is_empty() {
            return (text, ExtractionMethod::Article);
        }
    }

    let body_text = Selector::parse("body")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .map(visible_text)
        .unwrap_or_default();

    if body_text.is_empty() {
        (String::new(), ExtractionMethod::None)
    } else {
        (body_text, ExtractionMethod::Fallback)
    }
}

/// Text of an element without script/style content, whitespace collapsed
fn visible_text(element: ElementRef<'_>) -> String {
    let mut words: Vec<&str> = Vec::new();

    for node in element.descendants() {
        let text = match node.value().as_text() {
            Some(text) => text,
            None => continue,
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|e| SKIPPED_ELEMENTS.contains(&e.name()))
                .unwrap_or(false)
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }

    words.join(" ")
}

/// Bounds `text` to `max_chars` characters, appending `...` when cut
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn main_text(html: &str) -> (String, ExtractionMethod) {
        extract_main_text(&Html::parse_document(html))
    }

    #[test]
    fn test_article_preferred() {
        let (text, method) = main_text(
            "<html><body><nav>Menu</nav><article><h1>Title</h1>\n<p>Body   text</p></article></body></html>",
        );
        assert_eq!(text, "Title Body text");
        assert_eq!(method, ExtractionMethod::Article);
    }

    #[test]
    fn test_main_region() {
        let (text, method) = main_text("<html><body><div>x</div><main>Inside main</main></body></html>");
        assert_eq!(text, "Inside main");
        assert_eq!(method, ExtractionMethod::Article);
    }

    #[test]
    fn test_fallback_strips_scripts_and_styles() {
        let (text, method) = main_text(
            "<html><head><style>p{}</style></head><body><p>Hello</p><script>var x = 1;</script><p>world</p></body></html>",
        );
        assert_eq!(text, "Hello world");
        assert_eq!(method, ExtractionMethod::Fallback);
    }

    #[test]
    fn test_empty_article_falls_back() {
        let (text, method) = main_text("<html><body><article> </article><p>Outside</p></body></html>");
        assert_eq!(text, "Outside");
        assert_eq!(method, ExtractionMethod::Fallback);
    }

    #[test]
    fn test_no_text() {
        let (text, method) = main_text("<html><body><script>only()</script></body></html>");
        assert_eq!(text, "");
        assert_eq!(method, ExtractionMethod::None);
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("short", 10), "short");
        assert_eq!(truncate_preview("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_preview("abcdefghijkl", 5), "abcde...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate_preview("爬虫抓取网页", 2), "爬虫...");
    }
}
