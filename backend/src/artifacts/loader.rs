//! Loads the three fitted artifacts from the configured directory

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::{ClassifierFile, ClassifierModel};
use super::scaler::{MinMaxScaler, MinMaxScalerFile, StandardScaler, StandardScalerFile};
use super::{ArtifactError, Defect};
use crate::config::ArtifactsConfig;

/// Identifies one loaded artifact file
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtifactDigest {
    pub path: String,
    pub sha256: String,
}

/// What the server is serving, reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactManifest {
    pub model_kind: &'static str,
    pub model: ArtifactDigest,
    pub min_max_scaler: ArtifactDigest,
    pub standard_scaler: ArtifactDigest,
}

/// Artifacts ready to be handed to the prediction service
#[derive(Debug)]
pub struct LoadedArtifacts {
    pub min_max: MinMaxScaler,
    pub standard: StandardScaler,
    pub classifier: ClassifierModel,
    pub manifest: ArtifactManifest,
}

/// Read, parse and validate all three artifacts.
///
/// Fails on the first artifact that is missing, unreadable or malformed.
pub fn load_artifacts(config: &ArtifactsConfig) -> Result<LoadedArtifacts, ArtifactError> {
    let (min_max, min_max_digest) =
        load::<MinMaxScalerFile, MinMaxScaler>(&config.min_max_scaler_path())?;
    let (standard, standard_digest) =
        load::<StandardScalerFile, StandardScaler>(&config.standard_scaler_path())?;
    let (classifier, model_digest) =
        load::<ClassifierFile, ClassifierModel>(&config.model_path())?;

    tracing::debug!(
        classes = classifier.classes().len(),
        kind = classifier.kind(),
        "Classifier loaded"
    );

    let manifest = ArtifactManifest {
        model_kind: classifier.kind(),
        model: model_digest,
        min_max_scaler: min_max_digest,
        standard_scaler: standard_digest,
    };

    Ok(LoadedArtifacts {
        min_max,
        standard,
        classifier,
        manifest,
    })
}

fn load<F, T>(path: &Path) -> Result<(T, ArtifactDigest), ArtifactError>
where
    F: DeserializeOwned,
    T: TryFrom<F, Error = Defect>,
{
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: F = serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact = T::try_from(file).map_err(|defect| defect.at(path))?;

    let digest = ArtifactDigest {
        path: path.display().to_string(),
        sha256: format!("{:x}", Sha256::digest(&bytes)),
    };
    tracing::info!(path = %digest.path, sha256 = %digest.sha256, "Artifact loaded");

    Ok((artifact, digest))
}

impl ArtifactsConfig {
    pub fn model_path(&self) -> PathBuf {
        self.dir.join(&self.model_file)
    }

    pub fn min_max_scaler_path(&self) -> PathBuf {
        self.dir.join(&self.min_max_scaler_file)
    }

    pub fn standard_scaler_path(&self) -> PathBuf {
        self.dir.join(&self.standard_scaler_file)
    }
}
