//! Linear Risk Model
//!
//! Multinomial logistic model over standardized features:
//! `logits = b + W·z`, `z = (x - mean) / scale`, `p = softmax(logits)`.
//!
//! Artifacts are JSON, checked against the feature layout and
//! (optionally) a SHA-256 digest before use. The built-in model is centred
//! on the built-in catalog benchmarks, so a feature sitting at its benchmark
//! contributes nothing and the sign of every attribution agrees with the
//! benchmark comparison.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::inference::{InferenceError, ModelMetadata, RawPrediction, RiskModel};
use crate::logic::catalog::AdvisoryCatalog;
use crate::logic::features::{
    layout_hash, validate_feature_names, validate_layout, ModelInput, FEATURE_COUNT, FEATURE_LAYOUT,
    FEATURE_VERSION,
};
use crate::logic::risk::RiskLevel;

// ============================================================================
// ARTIFACT
// ============================================================================

/// On-disk model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub name: String,
    pub version: String,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub features: Vec<String>,
    pub classes: Vec<String>,
    pub means: Vec<f64>,
    pub scales: Vec<f64>,
    /// One row per class, one column per feature
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

/// Per-standardized-unit push toward At-Risk used by the built-in model.
/// Calibrated once against the three reference students (safe / medium / at-risk).
/// Signs follow the catalog directions: negative for higher-is-better.
const BUILTIN_RISK_DIRECTION: [f64; FEATURE_COUNT] = [
    -0.90, // avg_grade
    -0.35, // grade_consistency
    0.20,  // grade_range
    -0.60, // num_assessments
    -0.70, // assessment_completion_rate
    -0.05, // studied_credits
    0.25,  // num_of_prev_attempts
    0.30,  // low_performance
    0.35,  // low_engagement
    0.25,  // has_previous_attempts
];

/// Population centre the coefficients and intercepts were calibrated around
const CALIBRATION_CENTRE: [f64; FEATURE_COUNT] = [65.0, 85.0, 30.0, 6.0, 0.65, 75.0, 0.2, 0.25, 0.25, 0.15];
const BUILTIN_SCALES: [f64; FEATURE_COUNT] = [15.0, 10.0, 15.0, 2.5, 0.25, 35.0, 0.5, 0.43, 0.43, 0.36];

/// Safe / Medium Risk / At-Risk at the calibration centre
const BUILTIN_INTERCEPTS: [f64; 3] = [0.0, 0.5, 0.0];

impl LinearArtifact {
    pub fn builtin() -> Self {
        let safe: Vec<f64> = BUILTIN_RISK_DIRECTION.iter().map(|w| -w).collect();
        let medium = vec![0.0; FEATURE_COUNT];
        let at_risk = BUILTIN_RISK_DIRECTION.to_vec();
        let coefficients = vec![safe, medium, at_risk];

        let catalog = AdvisoryCatalog::builtin();
        let means: Vec<f64> = FEATURE_LAYOUT.iter().map(|name| catalog.baseline(name)).collect();

        // Moving the centre from the calibration point to the benchmarks
        // shifts each class logit by a constant; fold it into the intercept.
        let intercepts = coefficients
            .iter()
            .zip(BUILTIN_INTERCEPTS)
            .map(|(row, b)| {
                b + row
                    .iter()
                    .zip(means.iter().zip(CALIBRATION_CENTRE.iter().zip(BUILTIN_SCALES)))
                    .map(|(w, (mean, (centre, scale)))| w * (mean - centre) / scale)
                    .sum::<f64>()
            })
            .collect();

        Self {
            name: crate::constants::BUILTIN_MODEL_NAME.to_string(),
            version: "1".to_string(),
            feature_version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            features: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
            classes: RiskLevel::ALL.iter().map(|l| l.as_str().to_string()).collect(),
            means,
            scales: BUILTIN_SCALES.to_vec(),
            coefficients,
            intercepts,
        }
    }

    /// Structural checks; everything a later `predict` relies on
    pub fn validate(&self) -> Result<(), InferenceError> {
        validate_layout(self.feature_version, self.layout_hash)
            .and_then(|_| validate_feature_names(&self.features))
            .map_err(|e| InferenceError::Load(e.to_string()))?;

        let n_classes = self.classes.len();
        if n_classes != 2 && n_classes != 3 {
            return Err(InferenceError::Load(format!("expected 2 or 3 classes, got {}", n_classes)));
        }
        // Distinct canonical labels that include Safe and At-Risk: either
        // exactly {Safe, At-Risk} or the full three-class set.
        for (i, label) in self.classes.iter().enumerate() {
            if RiskLevel::from_label(label).is_none() {
                return Err(InferenceError::Load(format!("unknown class label '{}'", label)));
            }
            if self.classes[..i].contains(label) {
                return Err(InferenceError::Load(format!("duplicate class label '{}'", label)));
            }
        }
        if self.class_index(RiskLevel::Safe).is_none() || self.class_index(RiskLevel::AtRisk).is_none() {
            return Err(InferenceError::Load("model must include Safe and At-Risk classes".to_string()));
        }

        if self.means.len() != FEATURE_COUNT || self.scales.len() != FEATURE_COUNT {
            return Err(InferenceError::Load("means/scales length does not match feature count".to_string()));
        }
        if self.scales.iter().any(|s| !s.is_finite() || *s <= 0.0) || self.means.iter().any(|m| !m.is_finite()) {
            return Err(InferenceError::Load("scales must be finite and > 0, means finite".to_string()));
        }

        if self.coefficients.len() != n_classes || self.intercepts.len() != n_classes {
            return Err(InferenceError::Load("coefficient rows/intercepts do not match class count".to_string()));
        }
        for row in &self.coefficients {
            if row.len() != FEATURE_COUNT || row.iter().any(|w| !w.is_finite()) {
                return Err(InferenceError::Load("coefficient row malformed".to_string()));
            }
        }
        if self.intercepts.iter().any(|b| !b.is_finite()) {
            return Err(InferenceError::Load("intercepts must be finite".to_string()));
        }

        Ok(())
    }

    fn class_index(&self, level: RiskLevel) -> Option<usize> {
        self.classes.iter().position(|c| c == level.as_str())
    }
}

// ============================================================================
// MODEL
// ============================================================================

pub struct LinearRiskModel {
    artifact: LinearArtifact,
    metadata: ModelMetadata,
    safe_index: usize,
    risk_index: usize,
}

impl LinearRiskModel {
    /// Calibrated default, used when no artifact is configured
    pub fn builtin() -> Self {
        Self::assemble(LinearArtifact::builtin(), "linear", None)
    }

    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, InferenceError> {
        Self::build(artifact, "linear", None)
    }

    /// Load from a JSON artifact, verifying the SHA-256 digest when given
    pub fn from_file(path: &Path, expected_checksum: Option<&str>) -> Result<Self, InferenceError> {
        if !path.exists() {
            return Err(InferenceError::Load(format!("Model not found: {}", path.display())));
        }

        let bytes = std::fs::read(path)
            .map_err(|e| InferenceError::Load(format!("Failed to read model: {}", e)))?;

        let checksum = hex::encode(Sha256::digest(&bytes));
        if let Some(expected) = expected_checksum {
            if !checksum.eq_ignore_ascii_case(expected.trim()) {
                return Err(InferenceError::Load(format!(
                    "Checksum mismatch: expected {}, got {}",
                    expected, checksum
                )));
            }
        }

        let artifact: LinearArtifact = serde_json::from_slice(&bytes)
            .map_err(|e| InferenceError::Load(format!("Invalid model artifact: {}", e)))?;

        Self::build(artifact, "linear", Some(checksum))
    }

    fn build(artifact: LinearArtifact, model_type: &str, checksum: Option<String>) -> Result<Self, InferenceError> {
        artifact.validate()?;
        Ok(Self::assemble(artifact, model_type, checksum))
    }

    fn assemble(artifact: LinearArtifact, model_type: &str, checksum: Option<String>) -> Self {
        let safe_index = artifact.class_index(RiskLevel::Safe).unwrap_or(0);
        let risk_index = artifact.class_index(RiskLevel::AtRisk).unwrap_or(0);

        let metadata = ModelMetadata {
            name: artifact.name.clone(),
            model_type: model_type.to_string(),
            version: artifact.version.clone(),
            classes: artifact.classes.clone(),
            feature_names: artifact.features.clone(),
            feature_version: artifact.feature_version,
            layout_hash: artifact.layout_hash,
            checksum,
            loaded_at: chrono::Utc::now(),
        };

        Self { artifact, metadata, safe_index, risk_index }
    }

    fn standardize(&self, input: &ModelInput) -> [f64; FEATURE_COUNT] {
        let mut z = [0.0f64; FEATURE_COUNT];
        for (i, (x, slot)) in input.as_array().iter().zip(z.iter_mut()).enumerate() {
            *slot = (x - self.artifact.means[i]) / self.artifact.scales[i];
        }
        z
    }
}

impl RiskModel for LinearRiskModel {
    fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    fn predict(&self, input: &ModelInput) -> Result<RawPrediction, InferenceError> {
        let z = self.standardize(input);

        let logits: Vec<f64> = self
            .artifact
            .coefficients
            .iter()
            .zip(&self.artifact.intercepts)
            .map(|(row, b)| b + row.iter().zip(&z).map(|(w, zi)| w * zi).sum::<f64>())
            .collect();

        // Stable softmax
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();

        Ok(RawPrediction {
            classes: self.artifact.classes.clone(),
            probabilities: exps.iter().map(|e| e / total).collect(),
        })
    }

    /// Linear SHAP on the risk margin (At-Risk logit minus Safe logit).
    /// Standardized features have zero expectation, so each term is `Δw·z`.
    fn attributions(&self, input: &ModelInput) -> Option<[f64; FEATURE_COUNT]> {
        let z = self.standardize(input);
        let w_risk = &self.artifact.coefficients[self.risk_index];
        let w_safe = &self.artifact.coefficients[self.safe_index];

        let mut out = [0.0f64; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (w_risk[i] - w_safe[i]) * z[i];
        }
        Some(out)
    }
}

// ============================================================================
// TESTS
// ============================================================================
