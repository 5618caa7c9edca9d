//! Engine error taxonomy
//!
//! - `Validation`: bad input, never retried
//! - `InferenceUnavailable` / `InferenceTimeout`: transient, caller may retry with backoff
//! - `InferenceContractViolation`: model returned data outside the schema, fatal

use serde::Serialize;

use super::features::ValidationError;
use super::model::InferenceError;

/// Pipeline stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validation,
    Inference,
    Attribution,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Validation => "validation",
            Stage::Inference => "inference",
            Stage::Attribution => "attribution",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("model unavailable during {stage}: {reason}")]
    InferenceUnavailable { stage: Stage, reason: String },

    #[error("model did not answer within {elapsed_ms} ms during {stage}")]
    InferenceTimeout { stage: Stage, elapsed_ms: u64 },

    #[error("model output violated the contract during {stage}: {reason}")]
    InferenceContractViolation { stage: Stage, reason: String },
}

impl EngineError {
    /// Map an adapter error raised at `stage`
    pub fn from_inference(stage: Stage, err: InferenceError) -> Self {
        match err {
            InferenceError::Unavailable(reason) => EngineError::InferenceUnavailable { stage, reason },
            InferenceError::Timeout { elapsed_ms } => EngineError::InferenceTimeout { stage, elapsed_ms },
            InferenceError::ContractViolation(reason) => EngineError::InferenceContractViolation { stage, reason },
            InferenceError::Load(reason) => EngineError::InferenceUnavailable { stage, reason },
        }
    }

    /// Transient errors the caller may retry with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EngineError::InferenceUnavailable { .. } | EngineError::InferenceTimeout { .. }
        )
    }

    pub fn stage(&self) -> Stage {
        match self {
            EngineError::Validation(_) => Stage::Validation,
            EngineError::InferenceUnavailable { stage, .. }
            | EngineError::InferenceTimeout { stage, .. }
            | EngineError::InferenceContractViolation { stage, .. } => *stage,
        }
    }

    /// Stable machine-readable kind
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "validation_error",
            EngineError::InferenceUnavailable { .. } => "inference_unavailable",
            EngineError::InferenceTimeout { .. } => "inference_timeout",
            EngineError::InferenceContractViolation { .. } => "inference_contract_violation",
        }
    }
}
