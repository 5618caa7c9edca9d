//! Remote Risk Model
//!
//! HTTP client for a model served out of process.
//! POST `{"features": {name: value}}` → `{"classes": [...], "probabilities": [...]}`.
//! Blocking client: callers run it on a blocking thread.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use super::inference::{InferenceError, ModelMetadata, RawPrediction, RiskModel};
use crate::logic::features::{layout_hash, ModelInput, FEATURE_LAYOUT, FEATURE_VERSION};
use crate::logic::risk::RiskLevel;

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    features: BTreeMap<&'a str, f64>,
}

pub struct RemoteRiskModel {
    predict_url: String,
    timeout: Duration,
    metadata: ModelMetadata,
    http_client: reqwest::blocking::Client,
}

impl RemoteRiskModel {
    /// Build the client and, when a health URL is given, require it to answer 2xx
    pub fn connect(predict_url: &str, health_url: Option<&str>, timeout: Duration) -> Result<Self, InferenceError> {
        let http_client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| InferenceError::Load(format!("Failed to build HTTP client: {}", e)))?;

        if let Some(url) = health_url {
            let response = http_client
                .get(url)
                .send()
                .map_err(|e| map_transport_error(e, timeout))?;
            if !response.status().is_success() {
                return Err(InferenceError::Unavailable(format!(
                    "health check returned {}",
                    response.status()
                )));
            }
        }

        let metadata = ModelMetadata {
            name: predict_url.to_string(),
            model_type: "remote".to_string(),
            version: "unknown".to_string(),
            classes: RiskLevel::ALL.iter().map(|l| l.as_str().to_string()).collect(),
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            checksum: None,
            loaded_at: chrono::Utc::now(),
        };

        Ok(Self {
            predict_url: predict_url.to_string(),
            timeout,
            metadata,
            http_client,
        })
    }
}

fn map_transport_error(err: reqwest::Error, timeout: Duration) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Timeout { elapsed_ms: timeout.as_millis() as u64 }
    } else if err.is_decode() {
        InferenceError::ContractViolation(format!("undecodable response: {}", err))
    } else {
        InferenceError::Unavailable(err.to_string())
    }
}

impl RiskModel for RemoteRiskModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn predict(&self, input: &ModelInput) -> Result<RawPrediction, InferenceError> {
        let body = PredictRequest { features: input.named().collect() };

        let response = self
            .http_client
            .post(&self.predict_url)
            .json(&body)
            .send()
            .map_err(|e| map_transport_error(e, self.timeout))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(InferenceError::Unavailable(format!("model server returned {}", status)));
        }
        if !status.is_success() {
            return Err(InferenceError::ContractViolation(format!("model server rejected input: {}", status)));
        }

        response
            .json::<RawPrediction>()
            .map_err(|e| map_transport_error(e, self.timeout))
    }
}
