//! WebAssembly module for Crop Advisor
//!
//! Provides client-side helpers for:
//! - Offline validation of soil readings before submission
//! - Crop catalog lookups
//! - Rendering prediction outcomes

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Check a reading against the same realistic ranges the server enforces
#[wasm_bindgen]
pub fn validate_soil_reading(
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
    temperature: f64,
    humidity: f64,
    ph: f64,
    rainfall: f64,
) -> bool {
    is_realistic_reading(
        nitrogen,
        phosphorus,
        potassium,
        temperature,
        humidity,
        ph,
        rainfall,
    )
}

/// Crop name for a class id, if the catalog has one
#[wasm_bindgen]
pub fn crop_name(class_id: i32) -> Option<String> {
    Crop::from_class_id(class_id as i64).map(|crop| crop.name().to_string())
}

/// Every crop name, ordered by class id
#[wasm_bindgen]
pub fn crop_names() -> js_sys::Array {
    Crop::ALL
        .iter()
        .map(|crop| JsValue::from_str(crop.name()))
        .collect()
}

/// Sentence to display for a prediction outcome returned by the API
#[wasm_bindgen]
pub fn outcome_message(outcome_json: &str) -> Result<String, JsValue> {
    let outcome: PredictionOutcome = serde_json::from_str(outcome_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid outcome JSON: {}", e)))?;
    Ok(outcome.message())
}
