use geo::{BoundingRect, Contains, MultiPolygon, Point};

use crate::models::GeoPoint;

/// Test whether `point` lies inside `polygon`.
///
/// Works for `Polygon` and `MultiPolygon` (x = lon, y = lat). A point inside
/// an interior ring is outside the polygon. Points exactly on a ring are
/// classified as outside.
pub fn point_in_polygon<G>(point: GeoPoint, polygon: &G) -> bool
where
    G: Contains<Point<f64>>,
{
    polygon.contains(&point.to_point())
}

/// Bounding box as (min_lon, min_lat, max_lon, max_lat)
pub fn polygon_bbox(polygon: &MultiPolygon<f64>) -> Option<(f64, f64, f64, f64)> {
    polygon
        .bounding_rect()
        .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
}
