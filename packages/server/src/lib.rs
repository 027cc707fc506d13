#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the relief map application.
//!
//! Loads the boundary `GeoJSON` and the help-request CSV once at startup
//! into an immutable [`AppState`] and serves the prepared views: the
//! animated choropleth grid, the filterable record table, the trend-panel
//! summaries, and the boundary polygons. Every endpoint is a pure function
//! of (state, query parameters) — nothing is cached or mutated between
//! requests.

mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use relief_map_analytics::Dataset;
use relief_map_geography_models::RegionCatalog;

/// Shared application state, read-only after startup.
pub struct AppState {
    /// The cleaned, category-expanded event set.
    pub dataset: Arc<Dataset>,
    /// Canonical region names.
    pub catalog: Arc<RegionCatalog>,
    /// Boundary polygons, served verbatim to the renderer.
    pub boundaries: Arc<geojson::FeatureCollection>,
}

/// Starts the relief map API server.
///
/// Loads the boundary and event files (paths from `RELIEF_MAP_BOUNDARIES`
/// and `RELIEF_MAP_EVENTS`, with `data/` defaults), builds the dataset,
/// and starts the Actix-Web HTTP server. This is a regular async function —
/// the caller provides the async runtime (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the boundary or event file cannot be loaded — the server has
/// nothing to serve without them.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let boundaries_path = std::env::var("RELIEF_MAP_BOUNDARIES")
        .unwrap_or_else(|_| "data/boundaries.json".to_string());
    let events_path = std::env::var("RELIEF_MAP_EVENTS")
        .unwrap_or_else(|_| "data/help_requests.csv".to_string());

    log::info!("Loading boundary data from {boundaries_path}...");
    let boundaries = relief_map_geography::load_boundaries(Path::new(&boundaries_path))
        .expect("Failed to load boundary data");

    log::info!("Loading help requests from {events_path}...");
    let (requests, drops) =
        relief_map_ingest::load_events(Path::new(&events_path), &boundaries.catalog)
            .expect("Failed to load help request data");
    let dataset = Dataset::new(requests);

    log::info!(
        "Dataset ready: {} requests across {} regions ({} rows dropped)",
        dataset.len(),
        boundaries.catalog.len(),
        drops.total()
    );

    let state = web::Data::new(AppState {
        dataset: Arc::new(dataset),
        catalog: Arc::new(boundaries.catalog),
        boundaries: Arc::new(boundaries.collection),
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/filters", web::get().to(handlers::filters))
                    .route("/choropleth", web::get().to(handlers::choropleth))
                    .route("/requests", web::get().to(handlers::requests))
                    .route("/trend", web::get().to(handlers::trend))
                    .route("/boundaries", web::get().to(handlers::boundaries)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
