use serde::{Deserialize, Serialize};

/// Default search radius in meters
pub const DEFAULT_RADIUS_M: f64 = 1000.0;

/// Default number of names kept per category
pub const DEFAULT_PER_CATEGORY_LIMIT: usize = 5;

/// Which matches survive truncation to the per-category limit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Any `limit` distinct names; corpus order in practice, not a ranking
    #[default]
    Any,
    /// Closest POIs first, ties by corpus order
    NearestFirst,
}

/// Per-call query parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnrichOptions {
    pub radius_m: f64,
    pub per_category_limit: usize,
    pub selection: Selection,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_RADIUS_M,
            per_category_limit: DEFAULT_PER_CATEGORY_LIMIT,
            selection: Selection::Any,
        }
    }
}

impl EnrichOptions {
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_limit(mut self, per_category_limit: usize) -> Self {
        self.per_category_limit = per_category_limit;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Degenerate parameters that can never produce a name
    pub fn is_degenerate(&self) -> bool {
        self.per_category_limit == 0 || self.radius_m.is_nan() || self.radius_m <= 0.0
    }
}
