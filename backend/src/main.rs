//! Crop Advisor - Backend Server
//!
//! Recommends the crop best suited to a field from seven soil and climate
//! measurements, using a classifier and two scalers fitted offline.

use std::sync::Arc;

use anyhow::Context;
use axum::{http::Uri, routing::get, routing::post, Router};
use shared::PredictionService;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod artifacts;
mod config;
mod error;
mod handlers;
mod models;
mod routes;

pub use config::Config;

use crate::artifacts::ArtifactManifest;
use crate::error::AppError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<PredictionService>,
    pub manifest: Arc<ArtifactManifest>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crop_advisor_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load().context("Failed to load configuration")?;

    tracing::info!("Starting Crop Advisor Server");
    tracing::info!("Environment: {}", config.environment);

    // Artifacts must all load before any request is served
    tracing::info!("Loading model artifacts from {}", config.artifacts.dir.display());
    let loaded = artifacts::load_artifacts(&config.artifacts).map_err(|e| {
        tracing::error!("Cannot serve predictions: {}", e);
        e
    })?;
    tracing::info!("Model artifacts loaded ({})", loaded.manifest.model_kind);

    // Create application state
    let state = AppState {
        predictor: Arc::new(PredictionService::new(
            loaded.min_max,
            loaded.standard,
            loaded.classifier,
        )),
        manifest: Arc::new(loaded.manifest),
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = config.bind_address();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        // Legacy form endpoint, kept outside the versioned API
        .route("/predict", post(handlers::predict))
        .nest("/api/v1", routes::api_routes())
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Crop Advisor API v1.0"
}

/// Fallback for unknown routes
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {}", uri.path()))
}
