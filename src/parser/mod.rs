mod contradiction;
mod json;

pub use contradiction::{normalize_contradictions, Aspect, ContradictionRecord};

use crate::error::ParserError;
use serde_json::Value;

/// Parse the list of loosely-typed contradiction objects from a model response.
/// Callers degrade an error to an empty list.
pub fn try_parse_response(raw: &str) -> Result<Vec<Value>, ParserError> {
    json::try_parse_json_list(raw)
}
