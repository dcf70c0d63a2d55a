//! Geoenrich - district and nearby-POI enrichment for geolocated listings
//!
//! This library loads an OSM PBF extract into a per-category POI corpus,
//! indexes it on a uniform grid, resolves districts from per-city GeoJSON
//! boundaries, and exposes a single `enrich` call used by the server and
//! batch binaries.

pub mod config;
pub mod corpus;
pub mod enrichment;
pub mod error;
pub mod geometry;
pub mod index;
pub mod models;
pub mod pip;

pub use config::Config;
pub use enrichment::{EnrichOptions, Enricher, EnrichmentService, Selection};
pub use error::{Error, Result};
pub use models::{Category, EnrichmentResult, GeoPoint, Poi};
