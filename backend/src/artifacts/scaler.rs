//! Fitted feature scalers

use serde::Deserialize;
use shared::{FeatureVector, Transformer, FEATURE_COUNT};

use super::{per_feature, Defect};

/// Min-max scaler parameters as exported by the trainer
#[derive(Debug, Clone, Deserialize)]
pub struct MinMaxScalerFile {
    #[serde(alias = "min_")]
    pub min: Vec<f64>,
    #[serde(alias = "scale_")]
    pub scale: Vec<f64>,
}

/// Maps each feature onto the fitted range: `x * scale + min`
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    min: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl MinMaxScaler {
    pub fn new(min: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Self {
        Self { min, scale }
    }
}

impl TryFrom<MinMaxScalerFile> for MinMaxScaler {
    type Error = Defect;

    fn try_from(file: MinMaxScalerFile) -> Result<Self, Self::Error> {
        Ok(Self::new(
            per_feature("min", file.min)?,
            per_feature("scale", file.scale)?,
        ))
    }
}

impl Transformer for MinMaxScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        features.map_indexed(|i, x| x * self.scale[i] + self.min[i])
    }
}

/// Standard scaler parameters as exported by the trainer.
///
/// A missing `mean` disables centering, a missing `scale` disables scaling.
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScalerFile {
    #[serde(default, alias = "mean_")]
    pub mean: Option<Vec<f64>>,
    #[serde(default, alias = "scale_")]
    pub scale: Option<Vec<f64>>,
}

/// Centers and normalizes each feature: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    pub fn new(mean: [f64; FEATURE_COUNT], scale: [f64; FEATURE_COUNT]) -> Self {
        Self {
            mean,
            scale: scale.map(non_zero_scale),
        }
    }
}

/// Constant features were fitted with zero variance and pass through unscaled
fn non_zero_scale(scale: f64) -> f64 {
    if scale == 0.0 {
        1.0
    } else {
        scale
    }
}

impl TryFrom<StandardScalerFile> for StandardScaler {
    type Error = Defect;

    fn try_from(file: StandardScalerFile) -> Result<Self, Self::Error> {
        let mean = match file.mean {
            Some(mean) => per_feature("mean", mean)?,
            None => [0.0; FEATURE_COUNT],
        };
        let scale = match file.scale {
            Some(scale) => per_feature("scale", scale)?,
            None => [1.0; FEATURE_COUNT],
        };
        Ok(Self::new(mean, scale))
    }
}

impl Transformer for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> FeatureVector {
        features.map_indexed(|i, x| (x - self.mean[i]) / self.scale[i])
    }
}
