//! Uniform lat/lon grid over a fixed set of points.
//!
//! Cells are `lat_step` degrees tall and `lon_step` degrees wide, where the
//! longitude step is widened by the latitude of the point farthest from the
//! equator so that no cell is narrower than the configured size in meters.

use hashbrown::HashMap;

use crate::geometry::{EARTH_RADIUS_M, METERS_PER_DEGREE};
use crate::models::GeoPoint;

/// Floor for cos(lat) when widening cells near the poles
const MIN_COS_LAT: f64 = 0.01;

/// Slack added to query windows so floating error never drops a boundary cell
const WINDOW_EPSILON_DEG: f64 = 1e-9;

type CellKey = (i32, i32);

/// Grid of point ids bucketed by cell
#[derive(Debug, Clone)]
pub struct GridIndex {
    lat_step: f64,
    lon_step: f64,
    cells: HashMap<CellKey, Vec<u32>>,
    len: usize,
}

impl GridIndex {
    /// Bucket `points` (ids are their positions in the slice)
    pub fn build(points: &[GeoPoint], cell_size_m: f64) -> Self {
        let max_abs_lat = points
            .iter()
            .map(|p| p.lat.abs())
            .fold(0.0_f64, f64::max)
            .min(90.0);

        let lat_step = cell_size_m / METERS_PER_DEGREE;
        let cos_ref = max_abs_lat.to_radians().cos().max(MIN_COS_LAT);
        let lon_step = (lat_step / cos_ref).min(360.0);

        let mut index = Self {
            lat_step,
            lon_step,
            cells: HashMap::new(),
            len: points.len(),
        };

        for (id, point) in points.iter().enumerate() {
            let key = index.cell_of(*point);
            index.cells.entry(key).or_default().push(id as u32);
        }

        index
    }

    fn lat_cell(&self, lat: f64) -> i32 {
        ((lat + 90.0) / self.lat_step).floor() as i32
    }

    fn lon_cell(&self, lon: f64) -> i32 {
        ((lon + 180.0) / self.lon_step).floor() as i32
    }

    fn cell_of(&self, point: GeoPoint) -> CellKey {
        (self.lat_cell(point.lat), self.lon_cell(point.lon))
    }

    /// Ids of every point that may lie within `radius_m` of `center`.
    ///
    /// A superset of the exact answer; callers filter by distance. Ids come
    /// back in ascending order.
    pub fn candidates(&self, center: GeoPoint, radius_m: f64) -> Vec<u32> {
        if self.cells.is_empty() || radius_m.is_nan() || radius_m <= 0.0 {
            return Vec::new();
        }

        let window = QueryWindow::around(center, radius_m);
        let lat_range = (
            self.lat_cell(window.lat_lo),
            self.lat_cell(window.lat_hi),
        );
        let lon_ranges: Vec<(i32, i32)> = window
            .lon_spans
            .iter()
            .map(|&(lo, hi)| (self.lon_cell(lo), self.lon_cell(hi)))
            .collect();

        let lat_cells = (lat_range.1 - lat_range.0 + 1) as usize;
        let lon_cells: usize = lon_ranges
            .iter()
            .map(|(lo, hi)| (hi - lo + 1) as usize)
            .sum();

        let mut ids = Vec::new();
        if lat_cells.saturating_mul(lon_cells) > self.cells.len() {
            // Huge window: walking occupied cells is cheaper than the window
            for (&(lat_idx, lon_idx), bucket) in &self.cells {
                let in_lat = lat_idx >= lat_range.0 && lat_idx <= lat_range.1;
                let in_lon = lon_ranges
                    .iter()
                    .any(|&(lo, hi)| lon_idx >= lo && lon_idx <= hi);
                if in_lat && in_lon {
                    ids.extend_from_slice(bucket);
                }
            }
        } else {
            for lat_idx in lat_range.0..=lat_range.1 {
                for &(lo, hi) in &lon_ranges {
                    for lon_idx in lo..=hi {
                        if let Some(bucket) = self.cells.get(&(lat_idx, lon_idx)) {
                            ids.extend_from_slice(bucket);
                        }
                    }
                }
            }
        }

        ids.sort_unstable();
        ids
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Cell size in degrees as (lat_step, lon_step)
    pub fn cell_degrees(&self) -> (f64, f64) {
        (self.lat_step, self.lon_step)
    }
}

/// Lat/lon bounding window of a spherical cap.
///
/// Longitude spans are split in two when the window crosses the antimeridian.
#[derive(Debug, Clone, PartialEq)]
struct QueryWindow {
    lat_lo: f64,
    lat_hi: f64,
    lon_spans: Vec<(f64, f64)>,
}

impl QueryWindow {
    fn around(center: GeoPoint, radius_m: f64) -> Self {
        let angular = radius_m / EARTH_RADIUS_M;
        let dlat = angular.to_degrees() + WINDOW_EPSILON_DEG;

        let lat_lo = center.lat - dlat;
        let lat_hi = center.lat + dlat;

        let full = vec![(-180.0, 180.0)];
        if lat_lo <= -90.0 || lat_hi >= 90.0 || angular >= std::f64::consts::PI {
            // Cap contains a pole: every longitude is reachable
            return Self {
                lat_lo: lat_lo.max(-90.0),
                lat_hi: lat_hi.min(90.0),
                lon_spans: full,
            };
        }

        let ratio = angular.sin() / center.lat.to_radians().cos();
        let lon_spans = if ratio >= 1.0 {
            full
        } else {
            let dlon = ratio.asin().to_degrees() + WINDOW_EPSILON_DEG;
            let lo = center.lon - dlon;
            let hi = center.lon + dlon;
            if lo < -180.0 {
                vec![(lo + 360.0, 180.0), (-180.0, hi)]
            } else if hi > 180.0 {
                vec![(lo, 180.0), (-180.0, hi - 360.0)]
            } else {
                vec![(lo, hi)]
            }
        };

        Self {
            lat_lo,
            lat_hi,
            lon_spans,
        }
    }
}
