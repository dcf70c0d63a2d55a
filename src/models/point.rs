//! Geographic point type shared by every lookup.

use geo::Point;
use serde::{Deserialize, Serialize};

/// Geographic point (lat/lon, WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// The "coordinates unknown" sentinel used by listing sources.
    pub const UNKNOWN: GeoPoint = GeoPoint { lat: 0.0, lon: 0.0 };

    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True for the (0, 0) sentinel. Every query short-circuits on it.
    pub fn is_unknown(&self) -> bool {
        self.lat == 0.0 && self.lon == 0.0
    }

    /// Finite and inside [-90, 90] x [-180, 180]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Usable for a lookup: valid and not the sentinel
    pub fn is_queryable(&self) -> bool {
        self.is_valid() && !self.is_unknown()
    }

    /// Convert to a `geo` point (x = lon, y = lat)
    pub fn to_point(self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

impl From<Point<f64>> for GeoPoint {
    fn from(p: Point<f64>) -> Self {
        GeoPoint {
            lat: p.y(),
            lon: p.x(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_unknown() {
        assert!(GeoPoint::UNKNOWN.is_unknown());
        assert!(!GeoPoint::UNKNOWN.is_queryable());
        // Only the exact pair is the sentinel
        assert!(!GeoPoint::new(0.0, 27.5).is_unknown());
        assert!(!GeoPoint::new(53.9, 0.0).is_unknown());
    }

    #[test]
    fn test_validity_bounds() {
        assert!(GeoPoint::new(53.9, 27.56).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(90.5, 10.0).is_valid());
        assert!(!GeoPoint::new(10.0, -180.1).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_point_axis_order() {
        let p = GeoPoint::new(53.9, 27.56).to_point();
        assert_eq!(p.x(), 27.56);
        assert_eq!(p.y(), 53.9);
        assert_eq!(GeoPoint::from(p), GeoPoint::new(53.9, 27.56));
    }
}
