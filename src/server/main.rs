//! Enrichment server.
//!
//! Loads the POI corpus and district boundaries once at startup, then serves
//! district + nearby-POI lookups over HTTP. Geodata can be reloaded without a
//! restart; requests keep hitting the old snapshot until the new one is ready.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geoenrich::{Config, EnrichmentResult, EnrichmentService, GeoPoint};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Upper bound on the per-category limit a client may request
const MAX_LIMIT: usize = 50;

#[derive(Parser, Debug)]
#[command(name = "enrich-server")]
#[command(about = "District and nearby-POI enrichment server")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "geoenrich.toml")]
    config: PathBuf,

    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,
}

/// Application state shared across handlers
struct AppState {
    service: EnrichmentService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Geoenrich Server");
    info!("Config: {}", args.config.display());

    let config = Config::load_from_file(&args.config)?;

    // Geodata must be fully loaded before the listener opens
    let service = tokio::task::spawn_blocking(move || EnrichmentService::start(config))
        .await?
        .context("Failed to load geodata")?;

    let state = Arc::new(AppState { service });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/enrich", get(enrich_handler))
        .route("/admin/reload", post(reload_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    pois: usize,
    cities: Vec<String>,
    loaded_at: DateTime<Utc>,
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.service.snapshot();

    Json(HealthResponse {
        status: "ok",
        pois: snapshot.index().len(),
        cities: snapshot.districts().cities().map(String::from).collect(),
        loaded_at: snapshot.loaded_at(),
    })
}

#[derive(Deserialize)]
struct EnrichQueryParams {
    lat: f64,
    lon: f64,
    city: String,
    /// Search radius in meters (defaults to the configured radius)
    radius: Option<f64>,
    /// Names kept per category (defaults to the configured limit)
    limit: Option<usize>,
}

/// District and nearby POIs for one point
async fn enrich_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EnrichQueryParams>,
) -> Json<EnrichmentResult> {
    let snapshot = state.service.snapshot();

    let mut options = *snapshot.options();
    if let Some(radius) = params.radius {
        options = options.with_radius(radius);
    }
    if let Some(limit) = params.limit {
        options = options.with_limit(limit.min(MAX_LIMIT));
    }

    let point = GeoPoint::new(params.lat, params.lon);
    Json(snapshot.enrich_with(point, &params.city, &options))
}

#[derive(Serialize)]
struct ReloadResponse {
    pois: usize,
    loaded_at: DateTime<Utc>,
}

/// Rebuild the snapshot from disk and swap it in
async fn reload_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReloadResponse>, (StatusCode, String)> {
    let reloaded = tokio::task::spawn_blocking(move || state.service.reload())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::error!("Reload failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;

    Ok(Json(ReloadResponse {
        pois: reloaded.index().len(),
        loaded_at: reloaded.loaded_at(),
    }))
}
