//! Fishing hotspot API service.
//!
//! Orchestrates the satellite pipeline and exposes the rendering boundary
//! over HTTP:
//! - overlay PNGs of the latest SST/chlorophyll slice
//! - per-species hotspot markers
//! - live (or simulated) vessel positions
//!
//! Pipeline errors degrade individual responses; they never take the
//! process down.

mod config;
mod handlers;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{extract::Extension, routing::get, Router};
use clap::Parser;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use fishspot_common::SpeciesTable;

use config::AppConfig;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "hotspot-api")]
#[command(about = "Fishing hotspot API server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Service configuration file
    #[arg(long, env = "FISHSPOT_CONFIG", default_value = "config/fishspot.yaml")]
    config: PathBuf,

    /// Species threshold table (built-in table when omitted)
    #[arg(long, env = "SPECIES_CONFIG")]
    species: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting fishing hotspot API server");

    let config = AppConfig::load(&args.config)?;
    let species = match &args.species {
        Some(path) => SpeciesTable::from_file(path)?,
        None => SpeciesTable::builtin(),
    };
    info!(species = species.species.len(), "species table loaded");

    let state = Arc::new(AppState::new(config, species).await?);

    let app = Router::new()
        .route("/overlay/:field", get(handlers::overlay_handler))
        .route("/hotspots/:species", get(handlers::hotspots_handler))
        .route("/vessels", get(handlers::vessels_handler))
        .route("/species", get(handlers::species_handler))
        .route("/health", get(handlers::health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    info!(listen = %args.listen, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
