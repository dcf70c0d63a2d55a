//! Geometry primitives: great-circle distance and point-in-polygon.

mod distance;
mod polygon;

pub use distance::{haversine_distance, EARTH_RADIUS_M, METERS_PER_DEGREE};
pub use polygon::{point_in_polygon, polygon_bbox};
