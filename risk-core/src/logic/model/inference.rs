//! Inference Boundary
//!
//! The engine only sees `RiskModel`. Implementations (linear artifact,
//! remote endpoint) are swappable without touching the pipeline.
//! Models are read-only after loading and shared across requests via `Arc`.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logic::features::{ModelInput, FEATURE_COUNT};
use crate::logic::risk::ProbabilityDistribution;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Model metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub model_type: String,       // "linear" or "remote"
    pub version: String,
    pub classes: Vec<String>,
    pub feature_names: Vec<String>,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub checksum: Option<String>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

/// Unchecked model output; converted by `into_distribution`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPrediction {
    pub classes: Vec<String>,
    pub probabilities: Vec<f64>,
}

impl RawPrediction {
    pub fn into_distribution(self) -> Result<ProbabilityDistribution, InferenceError> {
        ProbabilityDistribution::from_model_output(&self.classes, &self.probabilities)
    }
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("model unavailable: {0}")]
    Unavailable(String),

    #[error("model timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    #[error("model contract violation: {0}")]
    ContractViolation(String),

    #[error("model failed to load: {0}")]
    Load(String),
}

// ============================================================================
// RISK MODEL TRAIT
// ============================================================================

/// Boundary to a trained classifier
pub trait RiskModel: Send + Sync {
    fn metadata(&self) -> &ModelMetadata;

    /// Class probabilities for one input. Must be pure: same input, same output.
    fn predict(&self, input: &ModelInput) -> Result<RawPrediction, InferenceError>;

    /// Native additive attribution toward risk, in log-odds units, one value
    /// per layout feature. `None` when the model family has none.
    fn attributions(&self, _input: &ModelInput) -> Option<[f64; FEATURE_COUNT]> {
        None
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Where the model comes from
#[derive(Debug, Clone)]
pub enum ModelSource {
    /// Compiled-in calibrated linear model
    Builtin,
    /// Linear model artifact (JSON), optionally verified against a SHA-256 hex digest
    File { path: PathBuf, checksum: Option<String> },
    /// Remote inference endpoint
    Remote { predict_url: String, health_url: Option<String>, timeout: Duration },
}

impl ModelSource {
    /// Resolve from environment: REMOTE_MODEL_URL > MODEL_PATH > built-in
    pub fn from_env() -> Self {
        if let Ok(url) = std::env::var("REMOTE_MODEL_URL") {
            if !url.trim().is_empty() {
                return ModelSource::Remote {
                    predict_url: url,
                    health_url: std::env::var("REMOTE_MODEL_HEALTH_URL").ok(),
                    timeout: Duration::from_secs(crate::constants::DEFAULT_REMOTE_TIMEOUT_SECS),
                };
            }
        }

        match crate::constants::get_model_path() {
            Some(path) => ModelSource::File {
                path: PathBuf::from(path),
                checksum: crate::constants::get_model_checksum(),
            },
            None => ModelSource::Builtin,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ModelSource::Builtin => "builtin".to_string(),
            ModelSource::File { path, .. } => path.display().to_string(),
            ModelSource::Remote { predict_url, .. } => predict_url.clone(),
        }
    }
}

/// Load a model once; the result is shared read-only
pub fn load_model(source: &ModelSource) -> Result<Arc<dyn RiskModel>, InferenceError> {
    log::info!("Loading risk model from: {}", source.describe());

    let model: Arc<dyn RiskModel> = match source {
        ModelSource::Builtin => Arc::new(super::linear::LinearRiskModel::builtin()),
        ModelSource::File { path, checksum } => {
            Arc::new(super::linear::LinearRiskModel::from_file(path, checksum.as_deref())?)
        }
        ModelSource::Remote { predict_url, health_url, timeout } => Arc::new(
            super::remote::RemoteRiskModel::connect(predict_url, health_url.as_deref(), *timeout)?,
        ),
    };

    let meta = model.metadata();
    log::info!(
        "Risk model loaded: {} ({}, {} classes)",
        meta.name,
        meta.model_type,
        meta.classes.len()
    );

    Ok(model)
}
