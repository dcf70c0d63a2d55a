//! TOML configuration for geodata paths, tag rules and query defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::corpus::{CategoryRules, TagRule};
use crate::enrichment::{EnrichOptions, Selection};
use crate::error::Error;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub global: GlobalConfig,
    /// Supported city keys; one `<city>.geojson` is loaded per entry
    pub cities: Vec<String>,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
    /// Tag rules; the built-in table is used when omitted
    #[serde(default)]
    pub rules: Option<Vec<TagRule>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalConfig {
    pub poi_extract: PathBuf,
    pub district_dir: PathBuf,
    #[serde(default = "default_name_language")]
    pub name_language: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub radius_m: f64,
    pub per_category_limit: usize,
    pub selection: Selection,
    /// Grid cell edge; defaults to `radius_m`
    pub cell_size_m: Option<f64>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        let defaults = EnrichOptions::default();
        Self {
            radius_m: defaults.radius_m,
            per_category_limit: defaults.per_category_limit,
            selection: defaults.selection,
            cell_size_m: None,
        }
    }
}

fn default_name_language() -> String {
    "ru".to_string()
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = Self::from_toml(&content)?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot produce a usable snapshot
    pub fn validate(&self) -> std::result::Result<(), Error> {
        if self.cities.is_empty() {
            return Err(Error::Config("at least one city is required".to_string()));
        }
        if let Some(city) = self.cities.iter().find(|c| c.trim().is_empty()) {
            return Err(Error::Config(format!("invalid city key '{}'", city)));
        }
        if !self.enrichment.radius_m.is_finite() || self.enrichment.radius_m < 0.0 {
            return Err(Error::Config(format!(
                "radius_m must be a finite non-negative number, got {}",
                self.enrichment.radius_m
            )));
        }
        let cell = self.cell_size_m();
        if !cell.is_finite() || cell <= 0.0 {
            return Err(Error::Config(format!(
                "cell_size_m must be positive, got {}",
                cell
            )));
        }
        if matches!(&self.rules, Some(rules) if rules.is_empty()) {
            return Err(Error::Config("rules must not be empty when given".to_string()));
        }
        Ok(())
    }

    pub fn category_rules(&self) -> CategoryRules {
        match &self.rules {
            Some(rules) => CategoryRules::new(rules.clone()),
            None => CategoryRules::default(),
        }
    }

    pub fn enrich_options(&self) -> EnrichOptions {
        EnrichOptions {
            radius_m: self.enrichment.radius_m,
            per_category_limit: self.enrichment.per_category_limit,
            selection: self.enrichment.selection,
        }
    }

    pub fn cell_size_m(&self) -> f64 {
        self.enrichment
            .cell_size_m
            .unwrap_or(self.enrichment.radius_m)
    }
}
