//! Common types used across the platform

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use serde::{Deserialize, Serialize};

/// Number of measurements in one soil reading
pub const FEATURE_COUNT: usize = 7;

/// A soil or climate measurement, listed in feature vector order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Ph,
    Rainfall,
}

impl Feature {
    /// All features in the order the fitted artifacts expect them
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Nitrogen,
        Feature::Phosphorus,
        Feature::Potassium,
        Feature::Temperature,
        Feature::Humidity,
        Feature::Ph,
        Feature::Rainfall,
    ];

    /// Position of this feature inside a [`FeatureVector`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of the form field carrying this measurement
    pub fn field_name(self) -> &'static str {
        match self {
            Feature::Nitrogen => "Nitrogen",
            // Existing clients post this spelling.
            Feature::Phosphorus => "Phosporus",
            Feature::Potassium => "Potassium",
            Feature::Temperature => "Temperature",
            Feature::Humidity => "Humidity",
            Feature::Ph => "pH",
            Feature::Rainfall => "Rainfall",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Nitrogen => write!(f, "Nitrogen"),
            Feature::Phosphorus => write!(f, "Phosphorus"),
            Feature::Potassium => write!(f, "Potassium"),
            Feature::Temperature => write!(f, "Temperature"),
            Feature::Humidity => write!(f, "Humidity"),
            Feature::Ph => write!(f, "pH"),
            Feature::Rainfall => write!(f, "Rainfall"),
        }
    }
}

/// Ordered measurements fed through the scalers and the classifier.
///
/// The transform pipeline is positional: index `i` always holds
/// `Feature::ALL[i]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    /// Value of a single measurement
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.0.iter()
    }

    /// Build a new vector by applying `f` to each (position, value) pair
    pub fn map_indexed(&self, mut f: impl FnMut(usize, f64) -> f64) -> Self {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, value) in self.0.iter().enumerate() {
            out[i] = f(i, *value);
        }
        Self(out)
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Named string inputs as submitted by a client form
pub trait FieldSource {
    /// Raw value of the field, matched by exact (case-sensitive) name
    fn field(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> FieldSource for HashMap<String, String, S> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldSource for BTreeMap<String, String> {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// Ordered pairs answer with the first value of a repeated name
impl<'a> FieldSource for [(&'a str, &'a str)] {
    fn field(&self, name: &str) -> Option<&str> {
        self.iter().find(|(key, _)| *key == name).map(|(_, value)| *value)
    }
}

impl FieldSource for [(String, String)] {
    fn field(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}
