//! HTTP handlers for crop prediction

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::PredictionOutcome;
use crate::AppState;

/// Prediction result returned to the form
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub request_id: Uuid,
    /// Sentence to display to the user
    pub result: String,
    pub outcome: PredictionOutcome,
    pub predicted_at: DateTime<Utc>,
}

/// HTTP status for an outcome
pub fn outcome_status(outcome: &PredictionOutcome) -> StatusCode {
    match outcome {
        PredictionOutcome::Success { .. } | PredictionOutcome::UnknownClass { .. } => {
            StatusCode::OK
        }
        PredictionOutcome::InvalidFormat { .. } => StatusCode::BAD_REQUEST,
        PredictionOutcome::InvalidRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

/// Recommend a crop for the submitted soil and climate readings.
///
/// A body that cannot be read as a form is treated like a form with no
/// fields, which yields the invalid format outcome. When a field is repeated
/// its first value is used.
pub async fn predict(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> (StatusCode, Json<PredictionResponse>) {
    let request_id = Uuid::new_v4();

    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            tracing::debug!(%request_id, %rejection, "Unreadable prediction form");
            Vec::new()
        }
    };

    let outcome = state.predictor.predict(fields.as_slice());
    match &outcome {
        PredictionOutcome::Success { crop } => {
            tracing::info!(%request_id, %crop, "Crop predicted");
        }
        PredictionOutcome::UnknownClass { class_id } => {
            tracing::warn!(
                %request_id,
                class_id,
                "Classifier returned a class outside the crop catalog"
            );
        }
        PredictionOutcome::InvalidRange { .. } | PredictionOutcome::InvalidFormat { .. } => {
            tracing::debug!(%request_id, ?outcome, "Prediction input rejected");
        }
    }

    let status = outcome_status(&outcome);
    let response = PredictionResponse {
        request_id,
        result: outcome.message(),
        outcome,
        predicted_at: Utc::now(),
    };
    (status, Json(response))
}
