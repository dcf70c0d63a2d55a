//! Core data models for the enrichment system.

pub mod enrichment;
pub mod poi;
pub mod point;

pub use enrichment::{EnrichmentResult, ListingSummary};
pub use poi::{Category, Poi};
pub use point::GeoPoint;
