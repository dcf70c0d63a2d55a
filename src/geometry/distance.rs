use crate::models::GeoPoint;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Length of one degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Haversine distance between two points in meters
pub fn haversine_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1_rad = a.lat.to_radians();
    let lat2_rad = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push h a hair above 1 for antipodal points
    2.0 * EARTH_RADIUS_M * h.min(1.0).sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_for_same_point() {
        for p in [
            GeoPoint::new(53.9023, 27.5619),
            GeoPoint::new(-33.86, 151.21),
            GeoPoint::new(89.99, -179.99),
        ] {
            assert_eq!(haversine_distance(p, p), 0.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let minsk = GeoPoint::new(53.9023, 27.5619);
        let vitebsk = GeoPoint::new(55.1904, 30.2049);
        assert_eq!(
            haversine_distance(minsk, vitebsk),
            haversine_distance(vitebsk, minsk)
        );
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = haversine_distance(GeoPoint::new(10.0, 20.0), GeoPoint::new(11.0, 20.0));
        assert!((d - METERS_PER_DEGREE).abs() < 1e-6);
        assert!((d - 111_194.93).abs() < 0.01);
    }

    #[test]
    fn test_minsk_to_vitebsk() {
        // ~ 220 km great-circle
        let d = haversine_distance(
            GeoPoint::new(53.9023, 27.5619),
            GeoPoint::new(55.1904, 30.2049),
        );
        assert!(d > 215_000.0 && d < 225_000.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_is_half_circumference() {
        let d = haversine_distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_M).abs() < 1e-3);
    }
}
