//! Point-in-Polygon (PIP) district lookup.
//!
//! Loads per-city district boundaries from GeoJSON and resolves a point to the
//! first district (in file order) that contains it, using an R-tree over
//! bounding boxes to skip districts that cannot match.

mod boundary;
mod index;
mod service;

pub use boundary::{district_file, load_districts, parse_districts, DistrictPolygon};
pub use index::DistrictSet;
pub use service::DistrictResolver;
