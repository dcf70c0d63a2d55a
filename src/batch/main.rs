//! Batch enrichment of listing rows.
//!
//! Reads `id,lat,lon,city` CSV rows, enriches every row against one snapshot
//! and writes one JSON object per line to stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geoenrich::models::ListingSummary;
use geoenrich::{Config, Enricher, EnrichmentResult, GeoPoint};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "enrich-batch")]
#[command(about = "Enrich CSV listing rows with district and nearby POIs")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "geoenrich.toml")]
    config: PathBuf,

    /// CSV input with an `id,lat,lon,city` header
    #[arg(short, long)]
    input: PathBuf,

    /// Enrich rows on all cores
    #[arg(long)]
    parallel: bool,

    /// Emit flattened comma-joined strings instead of name lists
    #[arg(long)]
    summary: bool,

    /// Override the configured search radius in meters
    #[arg(long)]
    radius: Option<f64>,

    /// Override the configured per-category limit
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    id: String,
    /// Blank or unparsable coordinates are treated as unknown
    #[serde(deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
    city: String,
}

impl ListingRow {
    fn point(&self) -> GeoPoint {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => GeoPoint::new(lat, lon),
            _ => GeoPoint::UNKNOWN,
        }
    }
}

#[derive(Serialize)]
#[serde(untagged)]
enum Enriched {
    Full(EnrichmentResult),
    Summary(ListingSummary),
}

#[derive(Serialize)]
struct OutputRow<'a> {
    id: &'a str,
    #[serde(flatten)]
    enriched: Enriched,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays pure JSON lines
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Geoenrich Batch");
    info!("Config: {}", args.config.display());
    info!("Input: {}", args.input.display());

    let config = Config::load_from_file(&args.config)?;
    let enricher = Enricher::from_config(&config).context("Failed to load geodata")?;

    let mut options = *enricher.options();
    if let Some(radius) = args.radius {
        options = options.with_radius(radius);
    }
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }

    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open input {}", args.input.display()))?;
    let rows = csv::Reader::from_reader(file)
        .deserialize::<ListingRow>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("Failed to read listing rows")?;

    let unknown = rows.iter().filter(|r| r.point().is_unknown()).count();
    if unknown > 0 {
        warn!("{} of {} rows have unknown coordinates", unknown, rows.len());
    }

    let pb = ProgressBar::new(rows.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let enrich_row = |row: &ListingRow| {
        let result = enricher.enrich_with(row.point(), &row.city, &options);
        pb.inc(1);
        if args.summary {
            Enriched::Summary(result.summary())
        } else {
            Enriched::Full(result)
        }
    };

    // Output order always matches input order
    let results: Vec<Enriched> = if args.parallel {
        rows.par_iter().map(enrich_row).collect()
    } else {
        rows.iter().map(enrich_row).collect()
    };

    pb.finish_with_message("Enrichment complete");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (row, enriched) in rows.iter().zip(results) {
        let line = OutputRow {
            id: &row.id,
            enriched,
        };
        serde_json::to_writer(&mut out, &line)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    info!("Enriched {} rows", rows.len());

    Ok(())
}
