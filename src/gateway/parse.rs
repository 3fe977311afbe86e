//! Strict parsing of the model's JSON reply
//!
//! Repair policy:
//! - `category` is required; unknown labels fall back to `mixed`
//! - `confidence` is required and clamped to [0, 1]; a `"92%"` string means 0.92
//! - `disposal_steps` is required; blanks are dropped, at most 6 are kept
//! - `notes` defaults to empty and is cut to 180 characters
//! - `impact` keys that are missing, negative or non-numeric become 0

use serde_json::{Map, Value};

use super::ClassificationError;
use crate::models::{Classification, ImpactMap, WasteCategory};

pub const MAX_DISPOSAL_STEPS: usize = 6;
pub const MAX_NOTES_CHARS: usize = 180;

/// Parse raw model text into a validated classification
pub fn parse_classification(text: &str) -> Result<Classification, ClassificationError> {
    let body = extract_json_object(text)
        .ok_or_else(|| ClassificationError::invalid("no JSON object in response", text))?;

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ClassificationError::invalid(format!("malformed JSON: {}", e), text))?;

    let fields = value
        .as_object()
        .ok_or_else(|| ClassificationError::invalid("response is not a JSON object", text))?;

    let category = match fields.get("category") {
        Some(Value::String(label)) if !label.trim().is_empty() => {
            WasteCategory::from_label(label).unwrap_or_else(|| {
                tracing::warn!("Unknown category '{}', falling back to mixed", label);
                WasteCategory::Mixed
            })
        }
        _ => return Err(ClassificationError::invalid("missing category", text)),
    };

    let confidence = fields
        .get("confidence")
        .and_then(as_number)
        .ok_or_else(|| ClassificationError::invalid("missing or non-numeric confidence", text))?;
    if !confidence.is_finite() {
        return Err(ClassificationError::invalid("confidence is not finite", text));
    }

    let disposal_steps = parse_steps(fields.get("disposal_steps"));
    if disposal_steps.is_empty() {
        return Err(ClassificationError::invalid("missing disposal_steps", text));
    }

    let notes = match fields.get("notes") {
        Some(Value::String(notes)) => notes.trim().chars().take(MAX_NOTES_CHARS).collect(),
        _ => String::new(),
    };

    let impact = match fields.get("impact") {
        Some(Value::Object(map)) => parse_impact(map),
        _ => ImpactMap::default(),
    };

    Ok(Classification {
        category,
        confidence: confidence.clamp(0.0, 1.0),
        notes,
        disposal_steps,
        impact,
    })
}

/// Slice from the first `{` to the last `}`, tolerating prose or code fences
fn extract_json_object(text: &str) -> Option<&str> {
    let first = text.find('{')?;
    let last = text.rfind('}')?;
    (first < last).then(|| &text[first..=last])
}

/// Numbers, or numeric strings (models sometimes quote them). A `%`
/// suffix scales the value to a fraction: "92%" reads as 0.92.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_suffix('%') {
                Some(percent) => percent.trim().parse::<f64>().ok().map(|p| p / 100.0),
                None => s.parse().ok(),
            }
        }
        _ => None,
    }
}

fn parse_steps(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.as_str())
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .take(MAX_DISPOSAL_STEPS)
        .map(str::to_string)
        .collect()
}

fn parse_impact(map: &Map<String, Value>) -> ImpactMap {
    let score = |key: &str| map.get(key).and_then(as_number).unwrap_or(0.0);
    ImpactMap::new(score("greenhouse"), score("soil"), score("water"), score("energy"))
}
