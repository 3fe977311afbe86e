//! Dashboard aggregation over loaded records

use serde::Serialize;

use crate::models::{AnalysisRecord, WasteCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: WasteCategory,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub records: Vec<AnalysisRecord>,
    pub category_counts: Vec<CategoryCount>,
    pub total: usize,
    pub top_category: Option<CategoryCount>,
}

/// Filter by category (none = everything) and count per category in
/// first-seen order. Never touches the store.
pub fn summarize(records: &[AnalysisRecord], category: Option<WasteCategory>) -> DashboardSummary {
    let filtered: Vec<AnalysisRecord> = records
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .cloned()
        .collect();

    let mut category_counts: Vec<CategoryCount> = Vec::new();
    for record in &filtered {
        match category_counts.iter_mut().find(|c| c.category == record.category) {
            Some(entry) => entry.count += 1,
            None => category_counts.push(CategoryCount { category: record.category, count: 1 }),
        }
    }

    // ties keep the first-seen category
    let top_category = category_counts.iter().fold(None, |best: Option<CategoryCount>, c| match best {
        Some(b) if b.count >= c.count => Some(b),
        _ => Some(*c),
    });

    DashboardSummary {
        total: filtered.len(),
        records: filtered,
        category_counts,
        top_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, ImpactMap};
    use chrono::Utc;
    use uuid::Uuid;

    fn records(categories: &[WasteCategory]) -> Vec<AnalysisRecord> {
        categories
            .iter()
            .map(|&category| {
                AnalysisRecord::new(
                    Uuid::new_v4(),
                    Utc::now(),
                    Classification {
                        category,
                        confidence: 0.5,
                        notes: String::new(),
                        disposal_steps: vec!["sort".to_string()],
                        impact: ImpactMap::default(),
                    },
                    None,
                )
            })
            .collect()
    }

    use WasteCategory::*;

    #[test]
    fn test_no_filter_is_identity() {
        let all = records(&[Plastic, Paper, Plastic, Glass]);
        let summary = summarize(&all, None);

        assert_eq!(summary.records, all);
        assert_eq!(summary.total, 4);
        assert_eq!(
            summary.category_counts,
            vec![
                CategoryCount { category: Plastic, count: 2 },
                CategoryCount { category: Paper, count: 1 },
                CategoryCount { category: Glass, count: 1 },
            ]
        );
        assert_eq!(summary.top_category, Some(CategoryCount { category: Plastic, count: 2 }));
    }

    #[test]
    fn test_filter_keeps_only_matching_records() {
        let all = records(&[Plastic, Paper, Plastic, Organic, Plastic]);
        let summary = summarize(&all, Some(Plastic));

        assert_eq!(summary.records.len(), 3);
        assert!(summary.records.iter().all(|r| r.category == Plastic));
        let counted: usize = summary.category_counts.iter().map(|c| c.count).sum();
        assert_eq!(counted, summary.records.len());
    }

    #[test]
    fn test_filter_with_no_matches() {
        let summary = summarize(&records(&[Paper]), Some(Hazardous));
        assert!(summary.records.is_empty());
        assert!(summary.category_counts.is_empty());
        assert_eq!(summary.top_category, None);
    }

    #[test]
    fn test_ties_prefer_first_seen() {
        let summary = summarize(&records(&[Metal, Glass, Glass, Metal]), None);
        assert_eq!(summary.top_category.map(|c| c.category), Some(Metal));
    }
}
