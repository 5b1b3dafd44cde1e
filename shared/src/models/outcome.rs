//! Prediction outcome models

use serde::{Deserialize, Serialize};

use super::crop::Crop;

pub const INVALID_FORMAT_MESSAGE: &str =
    "Invalid input values. Please ensure all inputs are numeric.";

pub const INVALID_RANGE_MESSAGE: &str =
    "Invalid input values. Please ensure all inputs are within realistic ranges.";

pub const UNKNOWN_CLASS_MESSAGE: &str =
    "Sorry, we could not determine the best crop to be cultivated with the provided data.";

/// Result of a single prediction request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionOutcome {
    /// The classifier picked a crop from the catalog
    Success { crop: Crop },
    /// The classifier returned an id with no catalog entry
    UnknownClass { class_id: i64 },
    /// Every field parsed but at least one is outside its realistic range
    InvalidRange { message: String },
    /// A field was missing or not numeric
    InvalidFormat { message: String },
}

impl PredictionOutcome {
    pub fn invalid_format() -> Self {
        PredictionOutcome::InvalidFormat {
            message: INVALID_FORMAT_MESSAGE.to_string(),
        }
    }

    pub fn invalid_range() -> Self {
        PredictionOutcome::InvalidRange {
            message: INVALID_RANGE_MESSAGE.to_string(),
        }
    }

    /// Map a classifier output onto the catalog
    pub fn from_class_id(class_id: i64) -> Self {
        match Crop::from_class_id(class_id) {
            Some(crop) => PredictionOutcome::Success { crop },
            None => PredictionOutcome::UnknownClass { class_id },
        }
    }

    pub fn crop(&self) -> Option<Crop> {
        match self {
            PredictionOutcome::Success { crop } => Some(*crop),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PredictionOutcome::Success { .. })
    }

    /// Sentence shown to the end user
    pub fn message(&self) -> String {
        match self {
            PredictionOutcome::Success { crop } => {
                format!("{} is the best crop to be cultivated right there.", crop)
            }
            PredictionOutcome::UnknownClass { .. } => UNKNOWN_CLASS_MESSAGE.to_string(),
            PredictionOutcome::InvalidRange { message }
            | PredictionOutcome::InvalidFormat { message } => message.clone(),
        }
    }
}

impl std::fmt::Display for PredictionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}
