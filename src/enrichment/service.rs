//! Process-wide holder of the current enrichment snapshot.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{error, info};

use super::Enricher;
use crate::config::Config;
use crate::error::Result;
use crate::models::{EnrichmentResult, GeoPoint};

/// Serves lookups from an immutable snapshot and swaps in rebuilt ones.
///
/// Readers clone the `Arc` and never observe a half-built index. A reload
/// builds the replacement completely before the swap.
pub struct EnrichmentService {
    current: RwLock<Arc<Enricher>>,
    config: Config,
    /// Serializes reloads so two rebuilds never race each other
    reload_lock: Mutex<()>,
}

impl EnrichmentService {
    /// Build the first snapshot; fails fast when any geodata file is unusable
    pub fn start(config: Config) -> Result<Self> {
        let enricher = Enricher::from_config(&config)?;
        Ok(Self::with_snapshot(config, enricher))
    }

    pub fn with_snapshot(config: Config, enricher: Enricher) -> Self {
        Self {
            current: RwLock::new(Arc::new(enricher)),
            config,
            reload_lock: Mutex::new(()),
        }
    }

    /// The snapshot serving right now
    pub fn snapshot(&self) -> Arc<Enricher> {
        Arc::clone(&self.current.read())
    }

    pub fn enrich(&self, point: GeoPoint, city: &str) -> EnrichmentResult {
        self.snapshot().enrich(point, city)
    }

    /// Rebuild from the configured files and swap atomically.
    ///
    /// On failure the previous snapshot keeps serving.
    pub fn reload(&self) -> Result<Arc<Enricher>> {
        self.reload_with(Enricher::from_config)
    }

    pub(crate) fn reload_with<F>(&self, build: F) -> Result<Arc<Enricher>>
    where
        F: FnOnce(&Config) -> Result<Enricher>,
    {
        let _guard = self.reload_lock.lock();
        info!("Reloading enrichment snapshot...");

        let fresh = match build(&self.config) {
            Ok(enricher) => Arc::new(enricher),
            Err(e) => {
                error!("Reload failed, keeping current snapshot: {}", e);
                return Err(e);
            }
        };

        *self.current.write() = Arc::clone(&fresh);
        info!("Enrichment snapshot swapped");
        Ok(fresh)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::enrichment::EnrichOptions;
    use crate::error::Error;
    use crate::index::SpatialIndex;
    use crate::models::{Category, Poi};
    use crate::pip::DistrictResolver;

    const P: GeoPoint = GeoPoint {
        lat: 53.9023,
        lon: 27.5619,
    };

    fn config() -> Config {
        Config::from_toml(
            r#"
            cities = ["minsk"]

            [global]
            poi_extract = "/nonexistent/belarus.osm.pbf"
            district_dir = "/nonexistent/geo"
            "#,
        )
        .unwrap()
    }

    fn snapshot(names: &[&str]) -> Enricher {
        let pois = names
            .iter()
            .map(|n| Poi::new(*n, P, Category::Pharmacy))
            .collect::<Vec<_>>();
        let index = SpatialIndex::build(Arc::new(Corpus::from_pois(pois)), 1000.0);
        Enricher::new(index, DistrictResolver::new(), EnrichOptions::default())
    }

    #[test]
    fn test_start_fails_without_geodata() {
        let err = EnrichmentService::start(config()).err().unwrap();
        assert!(matches!(err, Error::CorpusIo { .. }));
    }

    #[test]
    fn test_reload_swaps_snapshot() {
        let service = EnrichmentService::with_snapshot(config(), snapshot(&["Old"]));
        let before = service.snapshot();

        service.reload_with(|_| Ok(snapshot(&["New"]))).unwrap();

        // Readers holding the old Arc still see the old data
        assert_eq!(before.enrich(P, "minsk").names(Category::Pharmacy), ["Old"]);
        assert_eq!(service.enrich(P, "minsk").names(Category::Pharmacy), ["New"]);
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let service = EnrichmentService::with_snapshot(config(), snapshot(&["Old"]));

        assert!(service.reload().is_err());
        assert_eq!(service.enrich(P, "minsk").names(Category::Pharmacy), ["Old"]);
    }
}
