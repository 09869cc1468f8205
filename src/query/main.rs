//! Query server for network coverage lookups.
//!
//! Resolves an address with api-adresse.data.gouv.fr and answers with the
//! 2G/3G/4G coverage of each provider in the matched city.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use netcoverage::config::Config;
use netcoverage::models::CoveragePayload;
use netcoverage::service::CoverageService;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Network coverage query server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    listen: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Coverage Table CSV (overrides the config file)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Geocoder base URL (overrides the config file)
    #[arg(long)]
    geocoder_url: Option<String>,
}

/// Application state shared across handlers
struct AppState {
    service: CoverageService,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = Config::load_or_default(args.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(table) = args.table {
        config.coverage.table_path = table;
    }
    if let Some(url) = args.geocoder_url {
        config.geocoder.base_url = url;
    }

    info!("Network Coverage Query Server");
    info!("Geocoder at {}", config.geocoder.base_url);
    info!("Coverage table at {}", config.coverage.table_path.display());

    if !config.coverage.table_path.exists() {
        warn!(
            "Coverage table {} does not exist yet, lookups will fail until it is built",
            config.coverage.table_path.display()
        );
    }

    let service = CoverageService::from_config(&config).context("Failed to create geocoder client")?;
    let state = Arc::new(AppState { service });

    let app = router(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/network_coverage", get(coverage_handler))
        .route("/network_coverage/", get(coverage_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let table = state.service.table_path().exists();

    Json(HealthResponse {
        status: if table { "ok" } else { "degraded" },
        coverage_table: table,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    coverage_table: bool,
}

/// Coverage for the city of an address
async fn coverage_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CoverageQueryParams>,
) -> Json<CoverageResponse> {
    match state.service.network_coverage(&params.q).await {
        Ok(payload) => Json(CoverageResponse::Coverage(payload)),
        Err(e) => {
            warn!("Coverage query for '{}' failed: {}", params.q, e);
            Json(CoverageResponse::Message {
                message: e.message(),
            })
        }
    }
}

#[derive(Deserialize)]
struct CoverageQueryParams {
    /// Free-text postal address; missing is treated as empty
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
#[serde(untagged)]
enum CoverageResponse {
    Coverage(CoveragePayload),
    Message { message: &'static str },
}
