//! Fitted model artifacts
//!
//! The scalers and the classifier are fitted offline and exported as JSON.
//! This module reads them once at startup, checks their shape, and exposes
//! them through the `Transformer` and `Classifier` traits from `shared`.

pub mod classifier;
pub mod loader;
pub mod scaler;

pub use loader::{load_artifacts, ArtifactManifest};

use std::path::{Path, PathBuf};

use shared::FEATURE_COUNT;
use thiserror::Error;

/// Errors raised while loading artifacts from disk
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Failed to read artifact {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(
        "Artifact {}: `{}` has {} entries, expected {}",
        .path.display(), .field, .found, .expected
    )]
    Dimension {
        path: PathBuf,
        field: String,
        expected: usize,
        found: usize,
    },

    #[error("Artifact {} is malformed: {}", .path.display(), .reason)]
    Malformed { path: PathBuf, reason: String },
}

/// Shape problem found in a parsed artifact, before the path is known
#[derive(Debug, Clone, PartialEq)]
pub enum Defect {
    Dimension {
        field: String,
        expected: usize,
        found: usize,
    },
    Malformed(String),
}

impl Defect {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Defect::Malformed(reason.into())
    }

    /// Attach the artifact path
    pub fn at(self, path: &Path) -> ArtifactError {
        let path = path.to_path_buf();
        match self {
            Defect::Dimension {
                field,
                expected,
                found,
            } => ArtifactError::Dimension {
                path,
                field,
                expected,
                found,
            },
            Defect::Malformed(reason) => ArtifactError::Malformed { path, reason },
        }
    }
}

/// Convert a per-feature parameter list into a fixed-size array
pub(crate) fn per_feature(
    field: &str,
    values: Vec<f64>,
) -> Result<[f64; FEATURE_COUNT], Defect> {
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(Defect::malformed(format!("`{}` contains {}", field, bad)));
    }
    values.try_into().map_err(|v: Vec<f64>| Defect::Dimension {
        field: field.to_string(),
        expected: FEATURE_COUNT,
        found: v.len(),
    })
}
