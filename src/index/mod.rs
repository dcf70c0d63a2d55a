//! Grid-bucketed spatial index for radius queries over the POI corpus.

mod grid;
mod spatial;

pub use grid::GridIndex;
pub use spatial::{Neighbor, SpatialIndex};
