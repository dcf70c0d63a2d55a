//! Point-of-interest records and their categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::GeoPoint;

/// POI category surfaced on enriched listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Metro stations and entrances
    Subway,
    Pharmacy,
    Kindergarten,
    School,
    Bank,
    Supermarket,
    /// Small convenience shops
    Convenience,
    /// Shopping malls
    Mall,
}

impl Category {
    /// All categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Category::Subway,
            Category::Pharmacy,
            Category::Kindergarten,
            Category::School,
            Category::Bank,
            Category::Supermarket,
            Category::Convenience,
            Category::Mall,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Subway => "subway",
            Category::Pharmacy => "pharmacy",
            Category::Kindergarten => "kindergarten",
            Category::School => "school",
            Category::Bank => "bank",
            Category::Supermarket => "supermarket",
            Category::Convenience => "convenience",
            Category::Mall => "mall",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

/// A named, categorized point. Immutable once loaded into a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poi {
    /// Display name; empty when the source element had none
    pub name: String,
    pub location: GeoPoint,
    pub category: Category,
}

impl Poi {
    pub fn new(name: impl Into<String>, location: GeoPoint, category: Category) -> Self {
        Self {
            name: name.into(),
            location,
            category,
        }
    }
}
