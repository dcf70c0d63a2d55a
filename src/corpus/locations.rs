//! Node coordinate table filled while streaming an extract.

use hashbrown::HashMap;
use osmpbfreader::{Node, NodeId};

use crate::models::GeoPoint;

/// Node id -> decimicro (lat, lon). Eight bytes of payload per node.
#[derive(Debug, Default)]
pub struct NodeLocations {
    coords: HashMap<NodeId, (i32, i32)>,
}

impl NodeLocations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: &Node) {
        self.coords
            .insert(node.id, (node.decimicro_lat, node.decimicro_lon));
    }

    pub fn get(&self, id: NodeId) -> Option<GeoPoint> {
        self.coords
            .get(&id)
            .map(|&(lat, lon)| GeoPoint::new(lat as f64 * 1e-7, lon as f64 * 1e-7))
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Arithmetic mean of the resolvable member coordinates.
    ///
    /// Not a true polygon centroid: a closed way counts its first node twice.
    pub fn mean_of(&self, nodes: &[NodeId]) -> Option<GeoPoint> {
        let mut sum_lat = 0.0;
        let mut sum_lon = 0.0;
        let mut count = 0usize;

        for point in nodes.iter().filter_map(|id| self.get(*id)) {
            sum_lat += point.lat;
            sum_lon += point.lon;
            count += 1;
        }

        if count == 0 {
            return None;
        }

        Some(GeoPoint::new(sum_lat / count as f64, sum_lon / count as f64))
    }
}
