//! District resolver across the supported cities.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use super::{load_districts, DistrictSet};
use crate::error::Result;
use crate::models::GeoPoint;

/// City key -> district set
#[derive(Default)]
pub struct DistrictResolver {
    sets: BTreeMap<String, DistrictSet>,
}

/// Lowercased, trimmed city key
fn city_key(city: &str) -> String {
    city.trim().to_lowercase()
}

impl DistrictResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `<dir>/<city>.geojson` for every city; the first failure aborts
    pub fn load<S: AsRef<str>>(dir: &Path, cities: &[S], name_language: &str) -> Result<Self> {
        let mut resolver = Self::new();
        for city in cities {
            let key = city_key(city.as_ref());
            let set = load_districts(dir, &key, name_language)?;
            resolver.insert(set);
        }
        info!(
            "District resolver ready for {} cities",
            resolver.sets.len()
        );
        Ok(resolver)
    }

    /// Add or replace the set for its city
    pub fn insert(&mut self, set: DistrictSet) {
        self.sets.insert(city_key(set.city()), set);
    }

    /// District containing `point` in `city`.
    ///
    /// Cities without a loaded set resolve to `None`.
    pub fn resolve(&self, city: &str, point: GeoPoint) -> Option<&str> {
        match self.sets.get(&city_key(city)) {
            Some(set) => set.resolve(point),
            None => {
                debug!("No district set loaded for city '{}'", city);
                None
            }
        }
    }

    pub fn district_set(&self, city: &str) -> Option<&DistrictSet> {
        self.sets.get(&city_key(city))
    }

    /// Named districts of `city` in load order
    pub fn district_names(&self, city: &str) -> Vec<&str> {
        self.district_set(city)
            .map(DistrictSet::names)
            .unwrap_or_default()
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    pub fn contains_city(&self, city: &str) -> bool {
        self.sets.contains_key(&city_key(city))
    }
}
