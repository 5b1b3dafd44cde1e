//! HTTP handlers for the crop catalog

use axum::Json;

use crate::models::{crop_catalog, CropEntry};

/// List every crop the model can recommend, ordered by class id
pub async fn list_crops() -> Json<Vec<CropEntry>> {
    Json(crop_catalog())
}
