//! Waste category model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed set of waste types the classifier may return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WasteCategory {
    Organic,
    Plastic,
    Paper,
    Metal,
    Glass,
    #[serde(rename = "e-waste")]
    EWaste,
    Textile,
    Hazardous,
    Mixed,
}

impl WasteCategory {
    pub const ALL: [WasteCategory; 9] = [
        WasteCategory::Organic,
        WasteCategory::Plastic,
        WasteCategory::Paper,
        WasteCategory::Metal,
        WasteCategory::Glass,
        WasteCategory::EWaste,
        WasteCategory::Textile,
        WasteCategory::Hazardous,
        WasteCategory::Mixed,
    ];

    /// Wire label, as written to the record store
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::Organic => "organic",
            WasteCategory::Plastic => "plastic",
            WasteCategory::Paper => "paper",
            WasteCategory::Metal => "metal",
            WasteCategory::Glass => "glass",
            WasteCategory::EWaste => "e-waste",
            WasteCategory::Textile => "textile",
            WasteCategory::Hazardous => "hazardous",
            WasteCategory::Mixed => "mixed",
        }
    }

    /// Display label for headings and reports
    pub fn title(&self) -> &'static str {
        match self {
            WasteCategory::Organic => "Organic",
            WasteCategory::Plastic => "Plastic",
            WasteCategory::Paper => "Paper",
            WasteCategory::Metal => "Metal",
            WasteCategory::Glass => "Glass",
            WasteCategory::EWaste => "E-Waste",
            WasteCategory::Textile => "Textile",
            WasteCategory::Hazardous => "Hazardous",
            WasteCategory::Mixed => "Mixed",
        }
    }

    /// Match a free-form label (case and surrounding whitespace ignored)
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_lowercase();
        let category = match normalized.as_str() {
            "organic" => WasteCategory::Organic,
            "plastic" => WasteCategory::Plastic,
            "paper" => WasteCategory::Paper,
            "metal" => WasteCategory::Metal,
            "glass" => WasteCategory::Glass,
            "e-waste" | "ewaste" | "e_waste" | "electronic" => WasteCategory::EWaste,
            "textile" => WasteCategory::Textile,
            "hazardous" => WasteCategory::Hazardous,
            "mixed" => WasteCategory::Mixed,
            _ => return None,
        };
        Some(category)
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WasteCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown waste category '{}'", s.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_serde() {
        for category in WasteCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_from_label_accepts_aliases() {
        assert_eq!(WasteCategory::from_label("  Plastic "), Some(WasteCategory::Plastic));
        assert_eq!(WasteCategory::from_label("E_WASTE"), Some(WasteCategory::EWaste));
        assert_eq!(WasteCategory::from_label("electronic"), Some(WasteCategory::EWaste));
        assert_eq!(WasteCategory::from_label("styrofoam"), None);
    }

    #[test]
    fn test_from_str_reports_unknown_label() {
        let err = "rubble".parse::<WasteCategory>().unwrap_err();
        assert!(err.contains("rubble"));
    }
}
