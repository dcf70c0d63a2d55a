//! Per-category radius index over a shared POI corpus.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::info;

use super::GridIndex;
use crate::corpus::Corpus;
use crate::geometry::haversine_distance;
use crate::models::{Category, GeoPoint, Poi};

/// A POI found by a radius query
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a> {
    pub poi: &'a Poi,
    pub distance_m: f64,
}

/// Read-only grids keyed by category, referencing POIs by position in the corpus
pub struct SpatialIndex {
    corpus: Arc<Corpus>,
    grids: BTreeMap<Category, GridIndex>,
    cell_size_m: f64,
}

impl SpatialIndex {
    /// Build one grid per category, in parallel
    pub fn build(corpus: Arc<Corpus>, cell_size_m: f64) -> Self {
        info!(
            "Building spatial index for {} POIs ({} m cells)...",
            corpus.len(),
            cell_size_m
        );

        let categories: Vec<Category> = corpus.categories().collect();
        let grids: BTreeMap<Category, GridIndex> = categories
            .into_par_iter()
            .map(|category| {
                let points: Vec<GeoPoint> =
                    corpus.pois(category).iter().map(|p| p.location).collect();
                (category, GridIndex::build(&points, cell_size_m))
            })
            .collect();

        for (category, grid) in &grids {
            info!(
                "  {}: {} points in {} cells",
                category,
                grid.len(),
                grid.cell_count()
            );
        }

        Self {
            corpus,
            grids,
            cell_size_m,
        }
    }

    /// Index over an empty corpus; every query returns nothing
    pub fn empty() -> Self {
        Self {
            corpus: Arc::new(Corpus::default()),
            grids: BTreeMap::new(),
            cell_size_m: 0.0,
        }
    }

    /// All POIs of `category` within `radius_m` meters of `center`.
    ///
    /// Results keep corpus order. Unknown or invalid centers, non-positive
    /// radii and unindexed categories yield an empty list.
    pub fn within_radius(
        &self,
        category: Category,
        center: GeoPoint,
        radius_m: f64,
    ) -> Vec<Neighbor<'_>> {
        if !center.is_queryable() {
            return Vec::new();
        }
        let grid = match self.grids.get(&category) {
            Some(g) => g,
            None => return Vec::new(),
        };

        let pois = self.corpus.pois(category);
        grid.candidates(center, radius_m)
            .into_iter()
            .filter_map(|id| {
                let poi = &pois[id as usize];
                let distance_m = haversine_distance(center, poi.location);
                (distance_m <= radius_m).then_some(Neighbor { poi, distance_m })
            })
            .collect()
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn cell_size_m(&self) -> f64 {
        self.cell_size_m
    }

    /// Number of indexed POIs across categories
    pub fn len(&self) -> usize {
        self.grids.values().map(GridIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
