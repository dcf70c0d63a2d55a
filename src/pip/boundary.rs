//! District boundary extraction from per-city GeoJSON files.

use std::fs;
use std::path::{Path, PathBuf};

use geo_types::{Geometry, MultiPolygon};
use geojson::{Feature, GeoJson};
use tracing::{info, warn};

use super::DistrictSet;
use crate::error::{Error, Result};
use crate::geometry::polygon_bbox;

/// A single district polygon with its display name
#[derive(Debug, Clone)]
pub struct DistrictPolygon {
    pub name: Option<String>,
    pub boundary: MultiPolygon<f64>,
}

impl DistrictPolygon {
    pub fn new(name: Option<String>, boundary: MultiPolygon<f64>) -> Self {
        Self { name, boundary }
    }

    /// Get the bounding box of this district
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        polygon_bbox(&self.boundary)
    }
}

/// Path of the boundary file for `city` inside `dir`
pub fn district_file(dir: &Path, city: &str) -> PathBuf {
    dir.join(format!("{}.geojson", city))
}

/// Load `<dir>/<city>.geojson` into a [`DistrictSet`].
///
/// Fails if the file is missing or is not a feature collection of polygons.
pub fn load_districts(dir: &Path, city: &str, name_language: &str) -> Result<DistrictSet> {
    let path = district_file(dir, city);
    info!("Loading districts for {} from {}", city, path.display());

    let content = fs::read_to_string(&path).map_err(|source| Error::DistrictIo {
        city: city.to_string(),
        path: path.clone(),
        source,
    })?;

    let districts =
        parse_districts(&content, name_language).map_err(|reason| Error::DistrictFormat {
            city: city.to_string(),
            path: path.clone(),
            reason,
        })?;

    info!("Loaded {} districts for {}", districts.len(), city);
    Ok(DistrictSet::new(city, districts))
}

/// Parse a GeoJSON feature collection, keeping file order
pub fn parse_districts(
    content: &str,
    name_language: &str,
) -> std::result::Result<Vec<DistrictPolygon>, String> {
    let geojson: GeoJson = content.parse().map_err(|e| format!("{}", e))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err("expected a FeatureCollection".to_string()),
    };

    let localized_key = format!("name:{}", name_language);
    let mut districts = Vec::with_capacity(collection.features.len());

    for (i, feature) in collection.features.into_iter().enumerate() {
        let name = feature_name(&feature, &localized_key);
        if name.is_none() {
            warn!("District feature #{} has no name", i);
        }

        let geometry = feature
            .geometry
            .ok_or_else(|| format!("feature #{} has no geometry", i))?;

        let shape = Geometry::<f64>::try_from(geometry.value)
            .map_err(|e| format!("feature #{}: {}", i, e))?;

        let boundary = match shape {
            Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
            Geometry::MultiPolygon(mp) => mp,
            _ => {
                return Err(format!(
                    "feature #{} is not a Polygon or MultiPolygon",
                    i
                ))
            }
        };

        let district = DistrictPolygon::new(name, boundary);
        if let Some((min_lon, min_lat, max_lon, max_lat)) = district.bbox() {
            let in_range = min_lon >= -180.0
                && max_lon <= 180.0
                && min_lat >= -90.0
                && max_lat <= 90.0;
            if !in_range {
                return Err(format!(
                    "feature #{} has coordinates outside lon/lat range",
                    i
                ));
            }
        }

        districts.push(district);
    }

    Ok(districts)
}

/// Localized name, then plain `name`
fn feature_name(feature: &Feature, localized_key: &str) -> Option<String> {
    feature
        .property(localized_key)
        .and_then(|v| v.as_str())
        .or_else(|| feature.property("name").and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}
