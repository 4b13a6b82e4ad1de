use crate::error::DocumentError;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

const PAPER_ID_KEY: &str = "paper_id";

/// Where a paper lives in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaperSlot {
    /// Position in a list-shaped document
    Index(usize),
    /// Key in an object-shaped document
    Key(String),
}

/// A paper selected for processing, with a snapshot of its record
#[derive(Debug, Clone)]
pub struct PaperEntry {
    pub slot: PaperSlot,
    pub paper_id: String,
    pub record: Value,
}

/// The input document: a list of papers carrying `paper_id`, or an object keyed by paper id
#[derive(Debug, Clone, PartialEq)]
pub struct PaperDocument {
    root: Value,
}

impl PaperDocument {
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = fs::read_to_string(path).map_err(|e| DocumentError::ReadInput {
            path: path.to_path_buf(),
            source: e,
        })?;
        let root: Value =
            serde_json::from_str(&content).map_err(|e| DocumentError::ParseInput {
                path: path.to_path_buf(),
                source: e,
            })?;
        Self::from_value(root)
    }

    pub fn from_value(root: Value) -> Result<Self, DocumentError> {
        match &root {
            Value::Array(_) | Value::Object(_) => Ok(Self { root }),
            Value::String(_) => Err(DocumentError::InvalidShape("a string")),
            Value::Number(_) => Err(DocumentError::InvalidShape("a number")),
            Value::Bool(_) => Err(DocumentError::InvalidShape("a boolean")),
            Value::Null => Err(DocumentError::InvalidShape("null")),
        }
    }

    #[cfg(test)]
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// Papers eligible for processing, in document order.
    ///
    /// List entries without a usable `paper_id`, and entries that are not JSON
    /// objects, are skipped with a warning.
    pub fn papers(&self) -> Vec<PaperEntry> {
        let mut entries = Vec::new();
        match &self.root {
            Value::Array(items) => {
                for (idx, paper) in items.iter().enumerate() {
                    if !paper.is_object() {
                        warn!("Entry {} is not a paper object. Skipping it.", idx);
                        continue;
                    }
                    let Some(id) = paper.get(PAPER_ID_KEY).filter(|id| !is_blank_id(id)) else {
                        warn!("A paper does not have a '{}' key. Skipping it.", PAPER_ID_KEY);
                        continue;
                    };
                    entries.push(PaperEntry {
                        slot: PaperSlot::Index(idx),
                        paper_id: display_id(id),
                        record: paper.clone(),
                    });
                }
            }
            Value::Object(map) => {
                for (key, paper) in map {
                    if !paper.is_object() {
                        warn!("Paper {} is not an object. Skipping it.", key);
                        continue;
                    }
                    entries.push(PaperEntry {
                        slot: PaperSlot::Key(key.clone()),
                        paper_id: key.clone(),
                        record: paper.clone(),
                    });
                }
            }
            _ => {}
        }
        entries
    }

    /// Set `field` on the paper at `slot`, replacing any previous value
    pub fn set_result(&mut self, slot: &PaperSlot, field: &str, value: Value) -> bool {
        let paper = match (&mut self.root, slot) {
            (Value::Array(items), PaperSlot::Index(idx)) => items.get_mut(*idx),
            (Value::Object(map), PaperSlot::Key(key)) => map.get_mut(key),
            _ => None,
        };
        match paper.and_then(Value::as_object_mut) {
            Some(record) => {
                record.insert(field.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Pretty-printed JSON with a four-space indent
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.root.serialize(&mut serializer)?;
        Ok(buf)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        let bytes = self.to_pretty_bytes()?;
        fs::write(path, bytes).map_err(|e| DocumentError::WriteOutput {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Ids that cannot identify a paper: null, false, 0, "", [] and {}
fn is_blank_id(id: &Value) -> bool {
    match id {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
