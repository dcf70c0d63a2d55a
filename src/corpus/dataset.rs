//! In-memory POI corpus grouped by category.

use std::collections::BTreeMap;

use crate::models::{Category, Poi};

/// Immutable set of POIs, grouped by category in encounter order
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    by_category: BTreeMap<Category, Vec<Poi>>,
}

impl Corpus {
    pub(crate) fn from_groups(by_category: BTreeMap<Category, Vec<Poi>>) -> Self {
        Self { by_category }
    }

    /// Build a corpus from already-extracted records, keeping their order
    pub fn from_pois(pois: impl IntoIterator<Item = Poi>) -> Self {
        let mut by_category: BTreeMap<Category, Vec<Poi>> = BTreeMap::new();
        for poi in pois {
            by_category.entry(poi.category).or_default().push(poi);
        }
        Self { by_category }
    }

    /// POIs of one category (empty slice if none were loaded)
    pub fn pois(&self, category: Category) -> &[Poi] {
        self.by_category
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Categories with at least one POI
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.by_category
            .iter()
            .filter(|(_, pois)| !pois.is_empty())
            .map(|(category, _)| *category)
    }

    pub fn counts(&self) -> BTreeMap<Category, usize> {
        self.by_category
            .iter()
            .map(|(category, pois)| (*category, pois.len()))
            .collect()
    }

    /// Total POI records across categories
    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
