//! Error types for loading geodata.
//!
//! Only setup can fail. Lookups express "nothing found" through `Option` and
//! empty collections.

use std::path::PathBuf;
use thiserror::Error;

/// Startup / reload errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The POI extract could not be opened or read.
    #[error("failed to read POI extract {}: {source}", path.display())]
    CorpusIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The POI extract is not a valid PBF stream.
    #[error("malformed POI extract {}: {source}", path.display())]
    CorpusFormat {
        path: PathBuf,
        #[source]
        source: osmpbfreader::Error,
    },

    /// A district boundary file could not be opened or read.
    #[error("failed to read district file for city '{city}' at {}: {source}", path.display())]
    DistrictIo {
        city: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A district boundary file is not a usable feature collection.
    #[error("malformed district file for city '{city}' at {}: {reason}", path.display())]
    DistrictFormat {
        city: String,
        path: PathBuf,
        reason: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for geodata loading.
pub type Result<T> = std::result::Result<T, Error>;
