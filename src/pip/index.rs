//! Spatial index for district lookups within one city.

use rstar::{RTree, RTreeObject, AABB};

use super::DistrictPolygon;
use crate::geometry::point_in_polygon;
use crate::models::GeoPoint;

/// Bounding-box entry pointing back at a district by load position
#[derive(Debug, Clone)]
struct IndexedDistrict {
    ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedDistrict {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Districts of one city, kept in file order
#[derive(Debug)]
pub struct DistrictSet {
    city: String,
    districts: Vec<DistrictPolygon>,
    tree: RTree<IndexedDistrict>,
}

impl DistrictSet {
    /// Index `districts`; their order decides which overlapping polygon wins
    pub fn new(city: &str, districts: Vec<DistrictPolygon>) -> Self {
        let indexed: Vec<IndexedDistrict> = districts
            .iter()
            .enumerate()
            .filter_map(|(ordinal, d)| {
                let (min_x, min_y, max_x, max_y) = d.bbox()?;
                Some(IndexedDistrict {
                    ordinal,
                    envelope: AABB::from_corners([min_x, min_y], [max_x, max_y]),
                })
            })
            .collect();

        Self {
            city: city.to_string(),
            districts,
            tree: RTree::bulk_load(indexed),
        }
    }

    /// Name of the first district (in load order) containing `point`.
    ///
    /// Returns `None` for the unknown sentinel, for points outside every
    /// district, and when the first containing district is unnamed.
    pub fn resolve(&self, point: GeoPoint) -> Option<&str> {
        if !point.is_queryable() {
            return None;
        }

        let query_envelope = AABB::from_point([point.lon, point.lat]);

        // R-tree narrows by envelope, exact containment decides, load order breaks ties
        let first = self
            .tree
            .locate_in_envelope_intersecting(&query_envelope)
            .filter(|entry| point_in_polygon(point, &self.districts[entry.ordinal].boundary))
            .map(|entry| entry.ordinal)
            .min()?;

        self.districts[first].name.as_deref()
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    /// Named districts in load order
    pub fn names(&self) -> Vec<&str> {
        self.districts
            .iter()
            .filter_map(|d| d.name.as_deref())
            .collect()
    }

    pub fn districts(&self) -> &[DistrictPolygon] {
        &self.districts
    }

    pub fn len(&self) -> usize {
        self.districts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn square(name: Option<&str>, min_lon: f64, min_lat: f64, size: f64) -> DistrictPolygon {
        let p = polygon![
            (x: min_lon, y: min_lat),
            (x: min_lon + size, y: min_lat),
            (x: min_lon + size, y: min_lat + size),
            (x: min_lon, y: min_lat + size),
        ];
        DistrictPolygon::new(name.map(String::from), MultiPolygon::new(vec![p]))
    }

    #[test]
    fn test_interior_point_resolves() {
        let set = DistrictSet::new(
            "minsk",
            vec![
                square(Some("Фрунзенский"), 27.0, 53.0, 1.0),
                square(Some("Партизанский"), 28.0, 53.0, 1.0),
            ],
        );
        assert_eq!(set.resolve(GeoPoint::new(53.5, 27.5)), Some("Фрунзенский"));
        assert_eq!(set.resolve(GeoPoint::new(53.5, 28.5)), Some("Партизанский"));
    }

    #[test]
    fn test_outside_every_polygon() {
        let set = DistrictSet::new("minsk", vec![square(Some("A"), 27.0, 53.0, 1.0)]);
        assert_eq!(set.resolve(GeoPoint::new(55.0, 27.5)), None);
        assert_eq!(set.resolve(GeoPoint::new(53.5, 30.0)), None);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let set = DistrictSet::new(
            "gomel",
            vec![
                square(Some("Big"), 30.0, 52.0, 2.0),
                square(Some("Small"), 30.5, 52.5, 0.5),
            ],
        );
        assert_eq!(set.resolve(GeoPoint::new(52.7, 30.7)), Some("Big"));

        let reversed = DistrictSet::new(
            "gomel",
            vec![
                square(Some("Small"), 30.5, 52.5, 0.5),
                square(Some("Big"), 30.0, 52.0, 2.0),
            ],
        );
        assert_eq!(reversed.resolve(GeoPoint::new(52.7, 30.7)), Some("Small"));
        assert_eq!(reversed.resolve(GeoPoint::new(52.1, 30.1)), Some("Big"));
    }

    #[test]
    fn test_unnamed_first_match() {
        let set = DistrictSet::new(
            "brest",
            vec![square(None, 23.0, 52.0, 1.0), square(Some("Named"), 23.0, 52.0, 1.0)],
        );
        assert_eq!(set.resolve(GeoPoint::new(52.5, 23.5)), None);
        assert_eq!(set.names(), vec!["Named"]);
    }

    #[test]
    fn test_sentinel_never_resolves() {
        // A district that actually covers (0, 0)
        let set = DistrictSet::new("null", vec![square(Some("Gulf"), -1.0, -1.0, 2.0)]);
        assert_eq!(set.resolve(GeoPoint::UNKNOWN), None);
        assert_eq!(set.resolve(GeoPoint::new(0.5, 0.5)), Some("Gulf"));
    }

    #[test]
    fn test_empty_set() {
        let set = DistrictSet::new("vitebsk", vec![]);
        assert!(set.is_empty());
        assert_eq!(set.resolve(GeoPoint::new(55.19, 30.2)), None);
    }
}
