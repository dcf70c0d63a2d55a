//! Tag rules mapping raw OSM tags to POI categories.

use osmpbfreader::Tags;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::Category;

/// `key=value` tag match that assigns `category`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    pub category: Category,
    pub key: String,
    pub value: String,
}

impl TagRule {
    pub fn new(category: Category, key: &str, value: &str) -> Self {
        Self {
            category,
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn matches(&self, tags: &Tags) -> bool {
        tags.get(self.key.as_str())
            .map(|v| v.as_str() == self.value)
            .unwrap_or(false)
    }
}

/// Independent rules; an element may match several categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<TagRule>,
}

impl CategoryRules {
    pub fn new(rules: Vec<TagRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[TagRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Categories matched by `tags`, each at most once, in rule order
    pub fn matching(&self, tags: &Tags) -> Vec<Category> {
        let mut categories = Vec::new();
        for rule in &self.rules {
            if !categories.contains(&rule.category) && rule.matches(tags) {
                categories.push(rule.category);
            }
        }
        categories
    }

    /// Categories that at least one rule can produce
    pub fn categories(&self) -> BTreeSet<Category> {
        self.rules.iter().map(|r| r.category).collect()
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(vec![
            TagRule::new(Category::Subway, "railway", "subway_entrance"),
            TagRule::new(Category::Subway, "station", "subway"),
            TagRule::new(Category::Pharmacy, "amenity", "pharmacy"),
            TagRule::new(Category::Kindergarten, "amenity", "kindergarten"),
            TagRule::new(Category::School, "amenity", "school"),
            TagRule::new(Category::Bank, "amenity", "bank"),
            TagRule::new(Category::Supermarket, "shop", "supermarket"),
            TagRule::new(Category::Convenience, "shop", "convenience"),
            TagRule::new(Category::Mall, "shop", "mall"),
        ])
    }
}
