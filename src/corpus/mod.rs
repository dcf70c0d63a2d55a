//! POI corpus: tag rules, the PBF loader and the resulting dataset.
//!
//! The corpus is loaded once, then shared read-only with the spatial index.

mod dataset;
mod loader;
mod locations;
mod rules;

pub use dataset::Corpus;
pub use loader::{CorpusBuilder, CorpusLoader, LoadStats};
pub use locations::NodeLocations;
pub use rules::{CategoryRules, TagRule};
