//! Environmental impact model

use serde::{Deserialize, Serialize};

/// Display labels, in slice/legend order
pub const IMPACT_LABELS: [&str; 4] = [
    "Greenhouse Emissions",
    "Soil Contamination",
    "Water Pollution",
    "Energy Use",
];

/// Four fixed harm scores reported by the classifier.
///
/// Values are kept finite and non-negative; use [`ImpactMap::sanitized`]
/// on anything that did not come from this crate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImpactMap {
    pub greenhouse: f64,
    pub soil: f64,
    pub water: f64,
    pub energy: f64,
}

impl ImpactMap {
    pub fn new(greenhouse: f64, soil: f64, water: f64, energy: f64) -> Self {
        Self { greenhouse, soil, water, energy }.sanitized()
    }

    /// Values in [`IMPACT_LABELS`] order
    pub fn values(&self) -> [f64; 4] {
        [self.greenhouse, self.soil, self.water, self.energy]
    }

    /// Replace negative or non-finite scores with zero
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            greenhouse: clean(self.greenhouse),
            soil: clean(self.soil),
            water: clean(self.water),
            energy: clean(self.energy),
        }
    }

    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }

    /// Fraction of the total per key; an all-zero map splits evenly
    pub fn fractions(&self) -> [f64; 4] {
        let values = self.sanitized().values();
        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return [0.25; 4];
        }
        values.map(|v| v / total)
    }

    /// Percentage share per key, rounded to one decimal
    pub fn shares(&self) -> [f64; 4] {
        self.fractions().map(|f| (f * 1000.0).round() / 10.0)
    }
}
