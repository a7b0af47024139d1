//! On-disk model artifacts.
//!
//! An artifact is a JSON document tagged by `kind`:
//!
//! ```json
//! {"kind": "linear", "coefficients": [0.03, 0.01, 0.04, 0.0, 0.65, -0.03, -0.06, -0.05], "intercept": 2.9}
//! ```
//!
//! or a `tree_ensemble` with flattened trees (see [`TreeEnsemble`]).

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::{LinearModel, Regressor, TreeEnsemble};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Model file {} not found", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to decode model file {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid model in {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("Model in {} expects {actual} features, the service provides {expected}", .path.display())]
    FeatureCount {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn from_json(content: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(content)
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::Linear(model) => model.validate(),
            ModelArtifact::TreeEnsemble(model) => model.validate(),
        }
    }

    pub fn into_regressor(self) -> Arc<dyn Regressor> {
        match self {
            ModelArtifact::Linear(model) => Arc::new(model),
            ModelArtifact::TreeEnsemble(model) => Arc::new(model),
        }
    }
}

/// Read, decode and validate the artifact at `path`.
///
/// `expected_features` is the width of the rows the caller will send; a model
/// trained on a different schema is rejected here rather than failing every
/// request later.
pub fn load_model(
    path: &Path,
    expected_features: usize,
) -> Result<Arc<dyn Regressor>, LoadError> {
    let content = std::fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let artifact = ModelArtifact::from_json(&content).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    artifact.validate().map_err(|reason| LoadError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;

    let model = artifact.into_regressor();
    if model.n_features() != expected_features {
        return Err(LoadError::FeatureCount {
            path: path.to_path_buf(),
            expected: expected_features,
            actual: model.n_features(),
        });
    }

    tracing::debug!(path = %path.display(), model = %model.describe(), "model artifact decoded");
    Ok(model)
}
