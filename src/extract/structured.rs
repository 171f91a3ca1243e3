//! Structured data summary from JSON-LD and microdata
//!
//! Only a handful of commonly useful fields are kept: product or article name,
//! description, price and currency, rating and review count.

use scraper::{Html, Selector};
use serde_json::Value;
use std::collections::BTreeMap;

/// Builds a flat summary of the page's embedded structured data
///
/// JSON-LD blocks are read first; a later item's `name` replaces an earlier
/// one while `description` keeps the first value seen. Microdata `price`
/// then overrides, and microdata `name` fills in only when still missing.
/// Unparseable blocks are skipped.
pub fn extract_structured(document: &Html) -> BTreeMap<String, String> {
    let mut summary = BTreeMap::new();

    if let Ok(selector) = Selector::parse("script[type='application/ld+json']") {
        for element in document.select(&selector) {
            let raw = element.text().collect::<String>();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => {
                    for item in json_ld_items(&value) {
                        summarize_json_ld(item, &mut summary);
                    }
                }
                Err(e) => tracing::debug!("Skipping unparseable JSON-LD block: {}", e),
            }
        }
    }

    summarize_microdata(document, &mut summary);

    summary
}

/// Flattens top-level arrays and `@graph` containers into individual items
fn json_ld_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(json_ld_items).collect(),
        Value::Object(map) => {
            let mut items = vec![value];
            if let Some(graph) = map.get("@graph") {
                items.extend(json_ld_items(graph));
            }
            items
        }
        _ => Vec::new(),
    }
}

fn summarize_json_ld(item: &Value, summary: &mut BTreeMap<String, String>) {
    let object = match item.as_object() {
        Some(object) => object,
        None => return,
    };

    if let Some(name) = object.get("name").and_then(scalar) {
        summary.insert("name".to_string(), name);
    }

    if !summary.contains_key("description") {
        if let Some(description) = object.get("description").and_then(scalar) {
            summary.insert("description".to_string(), description);
        }
    }

    let offer = match object.get("offers") {
        Some(Value::Array(offers)) => offers.first(),
        other => other,
    };
    if let Some(offer) = offer.and_then(Value::as_object) {
        if let Some(price) = offer.get("price").and_then(scalar) {
            summary.insert("price".to_string(), price);
        }
        if let Some(currency) = offer.get("priceCurrency").and_then(scalar) {
            summary.insert("currency".to_string(), currency);
        }
    }

    if let Some(rating) = object
        .get("aggregateRating")
        .and_then(|r| r.get("ratingValue"))
        .and_then(scalar)
    {
        summary.insert("rating".to_string(), rating);
    }

    if let Some(count) = object.get("reviewCount").and_then(scalar) {
        summary.insert("review_count".to_string(), count);
    }
}

fn summarize_microdata(document: &Html, summary: &mut BTreeMap<String, String>) {
    if let Some(price) = itemprop_value(document, "price") {
        summary.insert("price".to_string(), price);
    }
    if !summary.contains_key("name") {
        if let Some(name) = itemprop_value(document, "name") {
            summary.insert("name".to_string(), name);
        }
    }
}

/// First non-empty value of an `itemprop`, from its `content` attribute or its text
fn itemprop_value(document: &Html, prop: &str) -> Option<String> {
    let selector = Selector::parse(&format!("[itemscope] [itemprop='{}']", prop)).ok()?;

    document.select(&selector).find_map(|element| {
        let value = match element.value().attr("content") {
            Some(content) => content.trim().to_string(),
            None => element.text().collect::<String>().trim().to_string(),
        };
        (!value.is_empty()).then_some(value)
    })
}

/// Renders a JSON scalar as text; empty strings, nulls, false and containers yield None
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}
