//! Single-pass POI extraction from an OSM PBF extract.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use osmpbfreader::{Node, OsmObj, OsmPbfReader, Tags, Way};
use tracing::{debug, info};

use super::{CategoryRules, Corpus, NodeLocations};
use crate::error::{Error, Result};
use crate::models::{Category, GeoPoint, Poi};

/// Log a progress line every this many elements
const PROGRESS_EVERY: u64 = 5_000_000;

/// Counters collected while streaming
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub nodes: u64,
    pub ways: u64,
    pub relations: u64,
    /// Matching ways none of whose nodes had a known location
    pub unresolved_ways: u64,
}

impl LoadStats {
    pub fn elements(&self) -> u64 {
        self.nodes + self.ways + self.relations
    }
}

/// Incremental corpus construction from a stream of OSM elements.
///
/// Nodes must be pushed before the ways that reference them, which is the
/// order of a standard sorted extract.
pub struct CorpusBuilder {
    rules: CategoryRules,
    localized_name_key: String,
    locations: NodeLocations,
    by_category: BTreeMap<Category, Vec<Poi>>,
    stats: LoadStats,
}

impl CorpusBuilder {
    pub fn new(rules: CategoryRules, name_language: &str) -> Self {
        Self {
            rules,
            localized_name_key: format!("name:{}", name_language),
            locations: NodeLocations::new(),
            by_category: BTreeMap::new(),
            stats: LoadStats::default(),
        }
    }

    pub fn push(&mut self, obj: &OsmObj) {
        match obj {
            OsmObj::Node(node) => self.push_node(node),
            OsmObj::Way(way) => self.push_way(way),
            // Relations never become POIs
            OsmObj::Relation(_) => self.stats.relations += 1,
        }

        let seen = self.stats.elements();
        if seen % PROGRESS_EVERY == 0 {
            info!(
                "Scanned {} elements, {} POIs so far",
                seen,
                self.by_category.values().map(Vec::len).sum::<usize>()
            );
        }
    }

    fn push_node(&mut self, node: &Node) {
        self.stats.nodes += 1;
        self.locations.insert(node);

        if node.tags.is_empty() {
            return;
        }

        let categories = self.rules.matching(&node.tags);
        if categories.is_empty() {
            return;
        }

        let location = GeoPoint::new(node.lat(), node.lon());
        self.emit(&node.tags, location, categories);
    }

    fn push_way(&mut self, way: &Way) {
        self.stats.ways += 1;

        if way.tags.is_empty() {
            return;
        }
        let categories = self.rules.matching(&way.tags);
        if categories.is_empty() {
            return;
        }

        match self.locations.mean_of(&way.nodes) {
            Some(location) => self.emit(&way.tags, location, categories),
            None => {
                self.stats.unresolved_ways += 1;
                debug!("Could not resolve any node of way {}", way.id.0);
            }
        }
    }

    /// One POI per matched category
    fn emit(&mut self, tags: &Tags, location: GeoPoint, categories: Vec<Category>) {
        let name = self.name_of(tags);
        for category in categories {
            self.by_category
                .entry(category)
                .or_default()
                .push(Poi::new(name.clone(), location, category));
        }
    }

    /// Localized name, then plain `name`, then empty
    fn name_of(&self, tags: &Tags) -> String {
        tags.get(self.localized_name_key.as_str())
            .or_else(|| tags.get("name"))
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> LoadStats {
        self.stats
    }

    pub fn finish(self) -> Corpus {
        info!(
            "Scanned {} nodes, {} ways, {} relations ({} stored node locations)",
            self.stats.nodes,
            self.stats.ways,
            self.stats.relations,
            self.locations.len()
        );
        if self.stats.unresolved_ways > 0 {
            info!(
                "Skipped {} matching ways without resolvable nodes",
                self.stats.unresolved_ways
            );
        }

        let corpus = Corpus::from_groups(self.by_category);
        for (category, count) in corpus.counts() {
            info!("  {}: {} POIs", category, count);
        }
        corpus
    }
}

/// Loads a [`Corpus`] from a PBF file with a fixed rule table
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    rules: CategoryRules,
    name_language: String,
}

impl CorpusLoader {
    pub fn new(rules: CategoryRules, name_language: impl Into<String>) -> Self {
        Self {
            rules,
            name_language: name_language.into(),
        }
    }

    /// Stream `path` once and collect matching POIs.
    ///
    /// Any I/O or decoding error aborts the load.
    pub fn load(&self, path: &Path) -> Result<Corpus> {
        info!("Loading POI corpus from {}", path.display());

        let file = File::open(path).map_err(|source| Error::CorpusIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = OsmPbfReader::new(BufReader::new(file));

        let mut builder = CorpusBuilder::new(self.rules.clone(), &self.name_language);
        for obj in reader.iter() {
            let obj = obj.map_err(|source| Error::CorpusFormat {
                path: path.to_path_buf(),
                source,
            })?;
            builder.push(&obj);
        }

        let corpus = builder.finish();
        info!(
            "POI corpus ready: {} records from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }
}
