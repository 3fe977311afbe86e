//! Analysis record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ImpactMap, WasteCategory};

/// Validated classifier output, before it becomes a stored record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub category: WasteCategory,
    pub confidence: f64,
    pub notes: String,
    pub disposal_steps: Vec<String>,
    pub impact: ImpactMap,
}

/// One waste classification event, as persisted in the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: WasteCategory,
    pub confidence: f64,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub disposal_steps: Vec<String>,
    #[serde(default)]
    pub impact: ImpactMap,
    #[serde(default)]
    pub image_reference: Option<String>,
}

impl AnalysisRecord {
    pub fn new(
        id: Uuid,
        timestamp: DateTime<Utc>,
        classification: Classification,
        image_reference: Option<String>,
    ) -> Self {
        Self {
            id,
            timestamp,
            category: classification.category,
            confidence: classification.confidence.clamp(0.0, 1.0),
            notes: classification.notes,
            disposal_steps: classification.disposal_steps,
            impact: classification.impact.sanitized(),
            image_reference,
        }
    }

    /// Confidence as a percentage rounded to one decimal
    pub fn confidence_percent(&self) -> f64 {
        (self.confidence * 1000.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification() -> Classification {
        Classification {
            category: WasteCategory::Glass,
            confidence: 1.4,
            notes: "green bottle".to_string(),
            disposal_steps: vec!["rinse".to_string()],
            impact: ImpactMap { greenhouse: -1.0, soil: 1.0, water: 1.0, energy: 1.0 },
        }
    }

    #[test]
    fn test_new_enforces_invariants() {
        let record = AnalysisRecord::new(Uuid::new_v4(), Utc::now(), classification(), None);
        assert_eq!(record.confidence, 1.0);
        assert_eq!(record.impact.greenhouse, 0.0);
    }

    #[test]
    fn test_confidence_percent_rounds() {
        let mut record = AnalysisRecord::new(Uuid::new_v4(), Utc::now(), classification(), None);
        record.confidence = 0.91666;
        assert_eq!(record.confidence_percent(), 91.7);
    }

    #[test]
    fn test_serialized_field_names() {
        let record = AnalysisRecord::new(
            Uuid::new_v4(),
            Utc::now(),
            classification(),
            Some("abc.png".to_string()),
        );
        let value = serde_json::to_value(&record).unwrap();
        for key in ["id", "timestamp", "category", "confidence", "notes", "disposal_steps", "impact", "image_reference"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["impact"].as_object().unwrap().len(), 4);
    }
}
