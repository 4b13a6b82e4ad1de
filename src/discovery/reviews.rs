use crate::config::ReviewOrder;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static REVIEW_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^review_(\d+)_full$").expect("valid review key pattern"));

const PAIRING_KEY: &str = "app_pairing_content";

/// A review string together with the number carried by its key, if any
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReviewEntry {
    /// `n` from `review_<n>_full`; `None` for `app_pairing_content`
    number: Option<u64>,
    text: String,
}

enum ReviewKey {
    Numbered(Option<u64>),
    Pairing,
}

fn classify_key(key: &str) -> Option<ReviewKey> {
    if let Some(caps) = REVIEW_KEY.captures(key) {
        let number = caps.get(1).and_then(|m| m.as_str().parse().ok());
        return Some(ReviewKey::Numbered(number));
    }
    if key.to_lowercase() == PAIRING_KEY {
        return Some(ReviewKey::Pairing);
    }
    None
}

/// Collect every review string in a paper record, in document traversal order.
///
/// Keys matching `review_<digits>_full` or `app_pairing_content` (any case) contribute
/// their value when it is a non-blank string, or each non-blank string of an array.
/// Other objects and arrays are searched recursively; everything else is ignored.
pub fn extract_reviews(node: &Value) -> Vec<String> {
    collect_entries(node).into_iter().map(|e| e.text).collect()
}

/// Collect reviews and apply the configured numbering order
pub fn collect_reviews(node: &Value, order: ReviewOrder) -> Vec<String> {
    match order {
        ReviewOrder::Document => extract_reviews(node),
        ReviewOrder::Numeric => {
            let mut entries = collect_entries(node);
            // Stable: equal numbers keep traversal order, unnumbered entries go last
            entries.sort_by_key(|e| e.number.unwrap_or(u64::MAX));
            entries.into_iter().map(|e| e.text).collect()
        }
    }
}

fn collect_entries(node: &Value) -> Vec<ReviewEntry> {
    let mut entries = Vec::new();
    walk(node, &mut entries);
    entries
}

fn walk(node: &Value, entries: &mut Vec<ReviewEntry>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                match classify_key(key) {
                    Some(kind) => {
                        let number = match kind {
                            ReviewKey::Numbered(n) => n,
                            ReviewKey::Pairing => None,
                        };
                        push_review_value(value, number, entries);
                    }
                    None if value.is_object() || value.is_array() => walk(value, entries),
                    None => {}
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                walk(item, entries);
            }
        }
        _ => {}
    }
}

fn push_review_value(value: &Value, number: Option<u64>, entries: &mut Vec<ReviewEntry>) {
    match value {
        Value::String(s) => push_text(s, number, entries),
        Value::Array(items) => {
            for item in items {
                if let Value::String(s) = item {
                    push_text(s, number, entries);
                }
            }
        }
        _ => {}
    }
}

fn push_text(s: &str, number: Option<u64>, entries: &mut Vec<ReviewEntry>) {
    let trimmed = s.trim();
    if !trimmed.is_empty() {
        entries.push(ReviewEntry {
            number,
            text: trimmed.to_string(),
        });
    }
}
