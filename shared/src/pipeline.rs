//! Prediction pipeline: min-max scaling, standard scaling, classification
//!
//! The fitted scalers and the classifier are opaque to this module. Any
//! implementation of [`Transformer`] and [`Classifier`] can be plugged in,
//! whether loaded from disk or stubbed in tests.

use crate::models::PredictionOutcome;
use crate::types::{FeatureVector, FieldSource};
use crate::validation::read_feature_vector;

/// A fitted, read-only feature transform
pub trait Transformer: Send + Sync {
    fn transform(&self, features: &FeatureVector) -> FeatureVector;
}

/// A fitted, read-only multi-class classifier
pub trait Classifier: Send + Sync {
    /// Class id for a fully transformed feature vector
    fn predict(&self, features: &FeatureVector) -> i64;
}

/// Owns the fitted artifacts and turns submitted forms into outcomes.
///
/// Artifacts are never mutated after construction, so a single instance can
/// serve any number of concurrent callers.
pub struct PredictionService {
    min_max: Box<dyn Transformer>,
    standard: Box<dyn Transformer>,
    classifier: Box<dyn Classifier>,
}

impl PredictionService {
    /// Create a service from the min-max scaler, the standard scaler and the
    /// classifier, fitted in that pipeline order
    pub fn new(
        min_max: impl Transformer + 'static,
        standard: impl Transformer + 'static,
        classifier: impl Classifier + 'static,
    ) -> Self {
        Self {
            min_max: Box::new(min_max),
            standard: Box::new(standard),
            classifier: Box::new(classifier),
        }
    }

    /// Validate, transform, classify and label one submitted form
    pub fn predict<S>(&self, fields: &S) -> PredictionOutcome
    where
        S: FieldSource + ?Sized,
    {
        match read_feature_vector(fields) {
            Ok(features) => self.predict_features(&features),
            Err(e) if e.is_format_error() => PredictionOutcome::invalid_format(),
            Err(_) => PredictionOutcome::invalid_range(),
        }
    }

    /// Run an already validated vector through the pipeline
    pub fn predict_features(&self, features: &FeatureVector) -> PredictionOutcome {
        let scaled = self.min_max.transform(features);
        let scaled = self.standard.transform(&scaled);
        let class_id = self.classifier.predict(&scaled);
        PredictionOutcome::from_class_id(class_id)
    }
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService").finish_non_exhaustive()
    }
}
