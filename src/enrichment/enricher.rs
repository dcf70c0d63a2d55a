//! The enrichment facade: one district lookup plus one radius query per category.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{EnrichOptions, Selection};
use crate::config::Config;
use crate::corpus::{Corpus, CorpusLoader};
use crate::error::Result;
use crate::index::{Neighbor, SpatialIndex};
use crate::models::{Category, EnrichmentResult, GeoPoint};
use crate::pip::DistrictResolver;

/// Immutable snapshot of everything a lookup needs.
///
/// Safe to share across threads; queries never mutate it.
pub struct Enricher {
    index: SpatialIndex,
    districts: DistrictResolver,
    options: EnrichOptions,
    loaded_at: DateTime<Utc>,
}

impl Enricher {
    pub fn new(index: SpatialIndex, districts: DistrictResolver, options: EnrichOptions) -> Self {
        Self {
            index,
            districts,
            options,
            loaded_at: Utc::now(),
        }
    }

    /// Load the corpus, build the index and load every configured city.
    ///
    /// Blocks until done; any missing or malformed file fails the whole build.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let loader = CorpusLoader::new(config.category_rules(), &config.global.name_language);
        let corpus: Arc<Corpus> = Arc::new(loader.load(&config.global.poi_extract)?);
        let index = SpatialIndex::build(corpus, config.cell_size_m());

        let districts = DistrictResolver::load(
            &config.global.district_dir,
            &config.cities,
            &config.global.name_language,
        )?;

        info!(
            "Enrichment snapshot ready: {} POIs, {} cities",
            index.len(),
            districts.cities().count()
        );

        Ok(Self::new(index, districts, config.enrich_options()))
    }

    /// Enrich with the configured default radius and limit
    pub fn enrich(&self, point: GeoPoint, city: &str) -> EnrichmentResult {
        self.enrich_with(point, city, &self.options)
    }

    /// District and nearby POI names for `point` in `city`.
    ///
    /// Names are deduplicated, empty names dropped, and each list capped at
    /// `per_category_limit`. With [`Selection::Any`] callers must not rely on
    /// which names survive the cap.
    pub fn enrich_with(&self, point: GeoPoint, city: &str, options: &EnrichOptions) -> EnrichmentResult {
        let mut result = EnrichmentResult::empty();
        if !point.is_queryable() {
            debug!("Skipping enrichment for unusable point {:?}", point);
            return result;
        }

        result.district = self.districts.resolve(city, point).map(str::to_string);

        if options.is_degenerate() {
            return result;
        }

        for category in Category::all() {
            let found = self.index.within_radius(*category, point, options.radius_m);
            let names = select_names(found, options.per_category_limit, options.selection);
            result.by_category.insert(*category, names);
        }

        result
    }

    pub fn options(&self) -> &EnrichOptions {
        &self.options
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn districts(&self) -> &DistrictResolver {
        &self.districts
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Dedup by name, drop empty names, keep at most `limit`
fn select_names(mut found: Vec<Neighbor<'_>>, limit: usize, selection: Selection) -> Vec<String> {
    if selection == Selection::NearestFirst {
        // Stable sort keeps corpus order among equal distances
        found.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut names = Vec::new();
    for neighbor in found {
        if names.len() >= limit {
            break;
        }
        let name = neighbor.poi.name.as_str();
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        names.push(name.to_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::METERS_PER_DEGREE;
    use crate::models::Poi;
    use crate::pip::{DistrictPolygon, DistrictSet};
    use geo::{polygon, MultiPolygon};

    const P: GeoPoint = GeoPoint {
        lat: 53.9023,
        lon: 27.5619,
    };

    fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
        GeoPoint::new(origin.lat + meters / METERS_PER_DEGREE, origin.lon)
    }

    fn minsk_districts() -> DistrictResolver {
        let p = polygon![
            (x: 27.4, y: 53.8),
            (x: 27.7, y: 53.8),
            (x: 27.7, y: 54.0),
            (x: 27.4, y: 54.0),
        ];
        let mut resolver = DistrictResolver::new();
        resolver.insert(DistrictSet::new(
            "minsk",
            vec![DistrictPolygon::new(
                Some("Центральный".to_string()),
                MultiPolygon::new(vec![p]),
            )],
        ));
        resolver
    }

    fn enricher(pois: Vec<Poi>) -> Enricher {
        let index = SpatialIndex::build(Arc::new(Corpus::from_pois(pois)), 1000.0);
        Enricher::new(index, minsk_districts(), EnrichOptions::default())
    }

    fn sorted(names: &[String]) -> Vec<String> {
        let mut names = names.to_vec();
        names.sort();
        names
    }

    #[test]
    fn test_poi_at_point_is_found() {
        let e = enricher(vec![Poi::new("Aptека", P, Category::Pharmacy)]);
        let options = EnrichOptions::default().with_radius(10.0);
        let result = e.enrich_with(P, "minsk", &options);

        assert!(result.names(Category::Pharmacy).contains(&"Aptека".to_string()));
        assert!(result
            .by_category
            .values()
            .all(|names| names.len() <= options.per_category_limit));
        assert_eq!(result.district.as_deref(), Some("Центральный"));
    }

    #[test]
    fn test_subway_radius_scenario() {
        let e = enricher(vec![
            Poi::new("Немига", north_of(P, 200.0), Category::Subway),
            Poi::new("Купаловская", north_of(P, 600.0), Category::Subway),
            Poi::new("Октябрьская", north_of(P, 1500.0), Category::Subway),
        ]);
        let result = e.enrich(P, "minsk");
        assert_eq!(
            sorted(result.names(Category::Subway)),
            vec!["Купаловская".to_string(), "Немига".to_string()]
        );
    }

    #[test]
    fn test_sentinel_point_is_empty() {
        let e = enricher(vec![
            Poi::new("Null bank", GeoPoint::new(0.0, 0.0), Category::Bank),
            Poi::new("Aptека", P, Category::Pharmacy),
        ]);
        let result = e.enrich(GeoPoint::UNKNOWN, "minsk");
        assert_eq!(result.district, None);
        assert_eq!(result.by_category.len(), Category::all().len());
        assert!(result.by_category.values().all(Vec::is_empty));
    }

    #[test]
    fn test_dedup_and_empty_names() {
        let e = enricher(vec![
            Poi::new("Беларусбанк", north_of(P, 10.0), Category::Bank),
            Poi::new("", north_of(P, 20.0), Category::Bank),
            Poi::new("Беларусбанк", north_of(P, 30.0), Category::Bank),
            Poi::new("Приорбанк", north_of(P, 40.0), Category::Bank),
        ]);
        let result = e.enrich(P, "minsk");
        assert_eq!(
            sorted(result.names(Category::Bank)),
            vec!["Беларусбанк".to_string(), "Приорбанк".to_string()]
        );
    }

    #[test]
    fn test_limit_caps_distinct_names() {
        let pois = (0..12)
            .map(|i| Poi::new(format!("Школа №{}", i), north_of(P, i as f64 * 50.0), Category::School))
            .collect();
        let e = enricher(pois);

        let result = e.enrich(P, "minsk");
        assert_eq!(result.names(Category::School).len(), 5);

        let three = e.enrich_with(P, "minsk", &EnrichOptions::default().with_limit(3));
        assert_eq!(three.names(Category::School).len(), 3);
    }

    #[test]
    fn test_nearest_first_selection() {
        let e = enricher(vec![
            Poi::new("Far", north_of(P, 900.0), Category::Mall),
            Poi::new("Mid", north_of(P, 500.0), Category::Mall),
            Poi::new("Near", north_of(P, 100.0), Category::Mall),
        ]);
        let options = EnrichOptions::default()
            .with_limit(2)
            .with_selection(Selection::NearestFirst);
        let result = e.enrich_with(P, "minsk", &options);
        assert_eq!(result.names(Category::Mall), ["Near", "Mid"]);
    }

    #[test]
    fn test_degenerate_options_keep_district() {
        let e = enricher(vec![Poi::new("Aptека", P, Category::Pharmacy)]);

        let zero_radius = e.enrich_with(P, "minsk", &EnrichOptions::default().with_radius(0.0));
        assert!(zero_radius.by_category.values().all(Vec::is_empty));
        assert_eq!(zero_radius.district.as_deref(), Some("Центральный"));

        let negative = e.enrich_with(P, "minsk", &EnrichOptions::default().with_radius(-50.0));
        assert!(negative.by_category.values().all(Vec::is_empty));

        let zero_limit = e.enrich_with(P, "minsk", &EnrichOptions::default().with_limit(0));
        assert!(zero_limit.by_category.values().all(Vec::is_empty));
    }

    #[test]
    fn test_unsupported_city_has_no_district() {
        let e = enricher(vec![Poi::new("Aptека", P, Category::Pharmacy)]);
        let result = e.enrich(P, "pinsk");
        assert_eq!(result.district, None);
        assert_eq!(result.names(Category::Pharmacy), ["Aptека"]);
    }

    #[test]
    fn test_idempotent() {
        let e = enricher(vec![
            Poi::new("Немига", north_of(P, 200.0), Category::Subway),
            Poi::new("Aptека", north_of(P, 300.0), Category::Pharmacy),
        ]);
        assert_eq!(e.enrich(P, "minsk"), e.enrich(P, "minsk"));
    }

    #[test]
    fn test_concurrent_reads() {
        let e = Arc::new(enricher(vec![Poi::new("Немига", north_of(P, 200.0), Category::Subway)]));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let e = Arc::clone(&e);
                std::thread::spawn(move || e.enrich(P, "minsk"))
            })
            .collect();
        for handle in handles {
            let result = handle.join().unwrap();
            assert_eq!(result.names(Category::Subway), ["Немига"]);
        }
    }
}
