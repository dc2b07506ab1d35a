use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::encoder::FEATURE_NAMES;
use crate::error::AppError;

pub const LINEAR_REGRESSION: &str = "linear_regression";

/// A trained model that maps one feature row to one scalar
pub trait RegressionModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, AppError>;

    /// Number of input columns the model was fitted on
    fn n_features(&self) -> usize;

    fn name(&self) -> &str;
}

/// Ordinary least-squares model: `intercept + Σ coefficients[i] * x[i]`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, AppError> {
        if coefficients.is_empty() {
            return Err(AppError::ModelUnavailable(
                "linear model has no coefficients".to_string(),
            ));
        }
        if !intercept.is_finite() || coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AppError::ModelUnavailable(
                "linear model parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }
}

impl RegressionModel for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, AppError> {
        if features.len() != self.coefficients.len() {
            return Err(AppError::PredictionError(format!(
                "input has {} features, but the model expects {}",
                features.len(),
                self.coefficients.len()
            )));
        }

        let value = self
            .coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (c, x)| acc + c * x);

        if !value.is_finite() {
            return Err(AppError::PredictionError(
                "model produced a non-finite value".to_string(),
            ));
        }

        Ok(value)
    }

    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn name(&self) -> &str {
        LINEAR_REGRESSION
    }
}

/// On-disk envelope written by the offline training step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Descriptive information about the loaded artifact
#[derive(Debug, Clone, Serialize)]
pub struct ModelMetadata {
    pub path: PathBuf,
    pub model_type: String,
    pub version: Option<String>,
    pub feature_names: Vec<String>,
    pub n_features: usize,
    pub loaded_at: DateTime<Utc>,
}

/// Read and validate a model artifact
///
/// Any failure is reported as `ModelUnavailable`; the caller is expected to
/// refuse to serve predictions in that case.
pub fn load_model(path: &Path) -> Result<(LinearModel, ModelMetadata), AppError> {
    let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::ModelUnavailable(format!(
            "model file not found: {}",
            path.display()
        )),
        _ => AppError::ModelUnavailable(format!(
            "failed to read model file {}: {}",
            path.display(),
            e
        )),
    })?;

    let artifact: ModelArtifact = serde_json::from_str(&contents).map_err(|e| {
        AppError::ModelUnavailable(format!("malformed model file {}: {}", path.display(), e))
    })?;

    let (model, metadata) = from_artifact(artifact, path)?;

    info!(
        path = %path.display(),
        model_type = %metadata.model_type,
        version = metadata.version.as_deref().unwrap_or("unversioned"),
        n_features = metadata.n_features,
        "Model artifact loaded"
    );

    Ok((model, metadata))
}

pub fn from_artifact(
    artifact: ModelArtifact,
    path: &Path,
) -> Result<(LinearModel, ModelMetadata), AppError> {
    if artifact.model_type != LINEAR_REGRESSION {
        return Err(AppError::ModelUnavailable(format!(
            "unsupported model type: {}",
            artifact.model_type
        )));
    }

    let feature_names = match artifact.feature_names {
        Some(names) => {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(AppError::ModelUnavailable(format!(
                    "model feature order {:?} does not match expected {:?}",
                    names, FEATURE_NAMES
                )));
            }
            names
        }
        None => {
            warn!("Model artifact does not declare feature names, assuming encoder order");
            FEATURE_NAMES.iter().map(|n| n.to_string()).collect()
        }
    };

    let model = LinearModel::new(artifact.coefficients, artifact.intercept)?;
    if model.n_features() != FEATURE_NAMES.len() {
        warn!(
            expected = FEATURE_NAMES.len(),
            actual = model.n_features(),
            "Model coefficient count differs from encoder width, predictions will fail"
        );
    }

    let metadata = ModelMetadata {
        path: path.to_path_buf(),
        model_type: artifact.model_type,
        version: artifact.version,
        feature_names,
        n_features: model.n_features(),
        loaded_at: Utc::now(),
    };

    Ok((model, metadata))
}
