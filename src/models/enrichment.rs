//! Result of enriching a single listing location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Category;

/// District plus nearby POI names for one point.
///
/// Every category has an entry, empty when nothing matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub district: Option<String>,
    pub by_category: BTreeMap<Category, Vec<String>>,
}

impl EnrichmentResult {
    /// Result with no district and an empty list per category
    pub fn empty() -> Self {
        Self {
            district: None,
            by_category: Category::all().iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    /// Names found for a category (empty slice if none)
    pub fn names(&self, category: Category) -> &[String] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.district.is_none() && self.by_category.values().all(Vec::is_empty)
    }

    /// Flatten into the comma-joined strings stored on a listing row
    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            district: self
                .district
                .as_deref()
                .map(|d| d.trim().to_lowercase())
                .unwrap_or_default(),
            nearby: self
                .by_category
                .iter()
                .map(|(category, names)| (*category, names.join(", ")))
                .collect(),
        }
    }
}

/// Flattened text form of an [`EnrichmentResult`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    /// Lowercased district name, empty when unknown
    pub district: String,
    pub nearby: BTreeMap<Category, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_every_category() {
        let result = EnrichmentResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.by_category.len(), Category::all().len());
        assert!(result.names(Category::Bank).is_empty());
    }

    #[test]
    fn test_summary_joins_names() {
        let mut result = EnrichmentResult::empty();
        result.district = Some(" Центральный ".to_string());
        result.by_category.insert(
            Category::Pharmacy,
            vec!["Белфармация".to_string(), "Адель".to_string()],
        );

        let summary = result.summary();
        assert_eq!(summary.district, "центральный");
        assert_eq!(summary.nearby[&Category::Pharmacy], "Белфармация, Адель");
        assert_eq!(summary.nearby[&Category::Subway], "");
    }
}
