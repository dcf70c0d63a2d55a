//! Enrichment facade combining the district resolver and the POI index.
//!
//! [`Enricher`] is an immutable snapshot built once at startup;
//! [`EnrichmentService`] owns the live snapshot and swaps in reloaded ones.

mod enricher;
mod options;
mod service;

pub use enricher::Enricher;
pub use options::{EnrichOptions, Selection, DEFAULT_PER_CATEGORY_LIMIT, DEFAULT_RADIUS_M};
pub use service::EnrichmentService;
