//! EcoVision - Smart Waste Analyzer
//!
//! Single-page web app: upload a photo of waste, have a vision model
//! classify it, then browse disposal guidance, impact charts, PDF reports
//! and a dashboard of past analyses.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ECOVISION                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────────┐   ┌──────────────────┐  │
//! │  │  HTTP API  │──►│ Classification │──►│  Gemini (remote) │  │
//! │  │  (Axum)    │   │    Gateway     │   └──────────────────┘  │
//! │  └─────┬──────┘   └────────────────┘                         │
//! │        │  charts (plotters)  ·  reports (lopdf)  ·  dashboard│
//! │        ▼                                                     │
//! │  ┌──────────────────────┐   ┌─────────────────┐              │
//! │  │ ecovision_stats.json │   │  uploads/*.png  │              │
//! │  └──────────────────────┘   └─────────────────┘              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod gateway;
mod store;
mod charts;
mod report;
mod dashboard;
mod handlers;
mod error;


use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
    extract::DefaultBodyLimit,
};
use tower_http::{
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

pub use error::{AppError, AppResult};

use config::Config;
use gateway::{ClassificationGateway, GeminiClient};
use store::{ImageStore, RecordStore};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ecovision=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Startup aborted: {}", e);
            eprintln!("EcoVision cannot start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {:#}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(config: Config) -> anyhow::Result<()> {
    tracing::info!("EcoVision starting...");
    tracing::info!("Classifier: {} (timeout {}s)", config.gemini.model, config.gemini.timeout_seconds);

    let model = GeminiClient::new(&config.gemini)
        .context("Failed to create classification client")?;

    // Build application state
    let state = AppState {
        records: Arc::new(RecordStore::new(&config.stats_file)),
        images: Arc::new(ImageStore::new(&config.upload_dir)),
        gateway: Arc::new(ClassificationGateway::new(Arc::new(model))),
        config: config.clone(),
    };

    tracing::info!("Record store: {}", state.records.path().display());

    // Surface a corrupt log at startup instead of on first request
    match state.records.load() {
        Ok(records) => tracing::info!("Loaded {} past analyses", records.len()),
        Err(e) => tracing::warn!("{}", e),
    }

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from((config.host, config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await
        .context("Server terminated unexpectedly")?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordStore>,
    pub images: Arc<ImageStore>,
    pub gateway: Arc<ClassificationGateway>,
    pub config: Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;

    // Page
    let page_routes = Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(handlers::health::check));

    let api_routes = Router::new()
        // Analyses
        .route("/api/v1/analyses", post(handlers::analyses::create))
        .route("/api/v1/analyses/:id", get(handlers::analyses::get))
        .route("/api/v1/analyses/:id/image", get(handlers::analyses::image))
        .route("/api/v1/analyses/:id/chart.png", get(handlers::analyses::chart))

        // Reports
        .route("/api/v1/analyses/:id/report.pdf", get(handlers::reports::download))

        // Dashboard
        .route("/api/v1/dashboard", get(handlers::dashboard::summary))
        .route("/api/v1/dashboard/chart.png", get(handlers::dashboard::chart))
        .route("/api/v1/tip", get(handlers::dashboard::tip))

        .layer(DefaultBodyLimit::max(max_upload_bytes));

    // Combine all routes
    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
