//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::artifacts::ArtifactManifest;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub artifacts: ArtifactManifest,
}

/// Health check endpoint handler.
///
/// The server only starts once every artifact has loaded, so a response
/// always means the model is being served.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        artifacts: (*state.manifest).clone(),
    })
}
