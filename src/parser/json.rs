use crate::error::ParserError;
use serde_json::Value;

/// Keys that wrap the contradiction list when the model is forced to answer with an object
const WRAPPER_KEYS: &[&str] = &["contradictions", "results", "items"];

/// Parse a list of contradiction objects out of a model response.
///
/// The whole text is tried first, then the span from the first `[` to the last `]`.
/// Blank text is an empty list.
pub fn try_parse_json_list(raw: &str) -> Result<Vec<Value>, ParserError> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let direct = match serde_json::from_str::<Value>(text) {
        Ok(value) => match into_list(value) {
            Ok(items) => return Ok(items),
            Err(e) => e,
        },
        Err(e) => ParserError::Json(e),
    };
    tracing::debug!("Direct parse failed ({}), trying bracketed substring", direct);

    let slice = bracketed(text).ok_or(ParserError::NoJsonArray)?;
    let value = serde_json::from_str::<Value>(slice)?;
    into_list(value)
}

/// Substring from the first `[` through the last `]`, when both exist in that order
fn bracketed(s: &str) -> Option<&str> {
    let start = s.find('[')?;
    let end = s.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&s[start..=end])
}

fn into_list(value: Value) -> Result<Vec<Value>, ParserError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in WRAPPER_KEYS {
                if let Some(Value::Array(_)) = map.get(*key) {
                    if let Some(Value::Array(items)) = map.remove(*key) {
                        return Ok(items);
                    }
                }
            }
            if map.contains_key("contradiction_statement") {
                return Ok(vec![Value::Object(map)]);
            }
            Err(ParserError::UnexpectedShape("an object"))
        }
        Value::String(_) => Err(ParserError::UnexpectedShape("a string")),
        Value::Number(_) => Err(ParserError::UnexpectedShape("a number")),
        Value::Bool(_) => Err(ParserError::UnexpectedShape("a boolean")),
        Value::Null => Err(ParserError::UnexpectedShape("null")),
    }
}
