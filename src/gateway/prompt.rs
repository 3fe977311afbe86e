//! Fixed instruction sent alongside every image

use crate::models::WasteCategory;

/// Version tag of the JSON contract the model is asked to honour
pub const SCHEMA_VERSION: &str = "ecovision.classification.v1";

pub fn classification_prompt() -> String {
    let categories = WasteCategory::ALL
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are EcoVision, an environmental waste expert. \
         Given an image of waste, output STRICT JSON (schema {SCHEMA_VERSION}) with keys: \
         category (one of: {categories}), \
         confidence (number 0-1), \
         disposal_steps (array of 3-6 short imperative steps), \
         impact (object with numeric keys greenhouse, soil, water, energy, each 0-100), \
         notes (short string <= 180 chars). \
         Return ONLY the JSON object, no markdown."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_every_field_and_category() {
        let prompt = classification_prompt();
        for key in ["category", "confidence", "disposal_steps", "impact", "notes", "greenhouse", "soil", "water", "energy"] {
            assert!(prompt.contains(key), "prompt missing {key}");
        }
        assert!(prompt.contains("e-waste"));
    }
}
