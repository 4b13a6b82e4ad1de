use serde_json::{json, Value};

/// A contradiction between two reviews, normalized to a fixed set of fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContradictionRecord {
    pub contradiction_statement: String,
    pub identified_aspect: String,
    pub evidence: String,
    pub aspect_score: Option<i64>,
    pub evidence_score: Option<i64>,
}

impl ContradictionRecord {
    /// Normalize one loosely-typed object from the model.
    ///
    /// Non-string text fields become empty strings and unparseable scores become
    /// `None`; a value that is not an object yields an all-empty record.
    pub fn from_value(value: &Value) -> Self {
        Self {
            contradiction_statement: text_field(value, "contradiction_statement"),
            identified_aspect: text_field(value, "identified_aspect"),
            evidence: text_field(value, "evidence"),
            aspect_score: value.get("aspect_score").and_then(coerce_int),
            evidence_score: value.get("evidence_score").and_then(coerce_int),
        }
    }

    /// JSON form written to the output document; missing scores are `null`
    pub fn to_value(&self) -> Value {
        json!({
            "contradiction_statement": self.contradiction_statement,
            "identified_aspect": self.identified_aspect,
            "evidence": self.evidence,
            "aspect_score": self.aspect_score,
            "evidence_score": self.evidence_score,
        })
    }

    pub fn aspect(&self) -> Option<Aspect> {
        self.identified_aspect.parse().ok()
    }
}

/// Normalize every parsed object, keeping order and count
pub fn normalize_contradictions(raw: &[Value]) -> Vec<ContradictionRecord> {
    raw.iter().map(ContradictionRecord::from_value).collect()
}

fn text_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Integer coercion: integers as-is, finite floats truncated toward zero,
/// booleans as 0/1, and strings holding an optionally signed integer.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Review-quality dimensions a contradiction can be classified under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Aspect {
    Substance,
    Motivation,
    Clarity,
    MeaningfulComparison,
    Originality,
    Soundness,
    Replicability,
}

impl Aspect {
    pub const ALL: [Aspect; 7] = [
        Aspect::Substance,
        Aspect::Motivation,
        Aspect::Clarity,
        Aspect::MeaningfulComparison,
        Aspect::Originality,
        Aspect::Soundness,
        Aspect::Replicability,
    ];
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Aspect::Substance => write!(f, "Substance"),
            Aspect::Motivation => write!(f, "Motivation"),
            Aspect::Clarity => write!(f, "Clarity"),
            Aspect::MeaningfulComparison => write!(f, "Meaningful comparison"),
            Aspect::Originality => write!(f, "Originality"),
            Aspect::Soundness => write!(f, "Soundness"),
            Aspect::Replicability => write!(f, "Replicability"),
        }
    }
}

impl std::str::FromStr for Aspect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "substance" => Ok(Aspect::Substance),
            "motivation" => Ok(Aspect::Motivation),
            "clarity" => Ok(Aspect::Clarity),
            "meaningful comparison" => Ok(Aspect::MeaningfulComparison),
            "originality" => Ok(Aspect::Originality),
            "soundness" => Ok(Aspect::Soundness),
            "replicability" => Ok(Aspect::Replicability),
            _ => Err(format!("Unknown aspect: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_record() {
        let raw = json!({
            "contradiction_statement": "x",
            "identified_aspect": "Clarity",
            "evidence": "e",
            "aspect_score": 4,
            "evidence_score": 3,
            "extra": "dropped"
        });
        let record = ContradictionRecord::from_value(&raw);
        assert_eq!(
            record,
            ContradictionRecord {
                contradiction_statement: "x".to_string(),
                identified_aspect: "Clarity".to_string(),
                evidence: "e".to_string(),
                aspect_score: Some(4),
                evidence_score: Some(3),
            }
        );
        assert_eq!(record.aspect(), Some(Aspect::Clarity));
    }

    #[test]
    fn test_bad_score_becomes_null() {
        let record = ContradictionRecord::from_value(&json!({"aspect_score": "bad"}));
        assert_eq!(record.aspect_score, None);
        assert_eq!(record.evidence_score, None);
        assert_eq!(record.contradiction_statement, "");
        assert_eq!(record.identified_aspect, "");
        assert_eq!(record.evidence, "");
    }

    #[test]
    fn test_score_coercion() {
        assert_eq!(coerce_int(&json!(5)), Some(5));
        assert_eq!(coerce_int(&json!(" 3 ")), Some(3));
        assert_eq!(coerce_int(&json!("+2")), Some(2));
        assert_eq!(coerce_int(&json!(4.7)), Some(4));
        assert_eq!(coerce_int(&json!(true)), Some(1));
        assert_eq!(coerce_int(&json!("4.0")), None);
        assert_eq!(coerce_int(&json!(null)), None);
        assert_eq!(coerce_int(&json!([1])), None);
    }

    #[test]
    fn test_non_string_text_fields_are_empty() {
        let record = ContradictionRecord::from_value(&json!({
            "contradiction_statement": 12,
            "evidence": ["a"],
            "identified_aspect": null
        }));
        assert_eq!(record.contradiction_statement, "");
        assert_eq!(record.evidence, "");
        assert_eq!(record.identified_aspect, "");
    }

    #[test]
    fn test_malformed_entries_kept_in_order() {
        let raw = vec![
            json!({"evidence": "first"}),
            json!(7),
            json!("text"),
            json!({"evidence": "last"}),
        ];
        let records = normalize_contradictions(&raw);
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].evidence, "first");
        assert_eq!(records[1], ContradictionRecord::from_value(&json!({})));
        assert_eq!(records[3].evidence, "last");
    }

    #[test]
    fn test_null_scores_serialize_as_null() {
        let record = ContradictionRecord::from_value(&json!({}));
        assert_eq!(
            record.to_value(),
            json!({
                "contradiction_statement": "",
                "identified_aspect": "",
                "evidence": "",
                "aspect_score": null,
                "evidence_score": null
            })
        );
    }

    #[test]
    fn test_aspect_parsing() {
        assert_eq!("meaningful comparison".parse::<Aspect>(), Ok(Aspect::MeaningfulComparison));
        assert_eq!(" SOUNDNESS ".parse::<Aspect>(), Ok(Aspect::Soundness));
        assert_eq!("Meaningful_Comparison".parse::<Aspect>(), Ok(Aspect::MeaningfulComparison));
        assert!("Novelty".parse::<Aspect>().is_err());
        for aspect in Aspect::ALL {
            assert_eq!(aspect.to_string().parse::<Aspect>(), Ok(aspect));
        }
    }
}
