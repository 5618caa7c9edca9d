//! Feature Vector - Validated model input
//!
//! A `FeatureVector` can only be built by the validator (`validate.rs`),
//! so every value reaching the model adapter is in range.
//! `ModelInput` is the dense, layout-ordered view the adapters consume.

use serde::Serialize;
use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

// ============================================================================
// FEATURE VALUE
// ============================================================================

/// Observed value of one feature, as reported back to callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Real(f64),
    Integer(u64),
}

impl FeatureValue {
    pub fn as_f64(&self) -> f64 {
        match *self {
            FeatureValue::Real(v) => v,
            FeatureValue::Integer(v) => v as f64,
        }
    }
}

impl std::fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureValue::Real(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{:.0}", v)
                } else {
                    write!(f, "{:.2}", v)
                }
            }
            FeatureValue::Integer(v) => write!(f, "{}", v),
        }
    }
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// One validated prediction request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub(super) student_id: String,
    pub(super) avg_grade: f64,
    pub(super) grade_consistency: f64,
    pub(super) grade_range: f64,
    pub(super) num_assessments: u64,
    pub(super) assessment_completion_rate: f64,
    pub(super) studied_credits: u64,
    pub(super) num_of_prev_attempts: u64,
    pub(super) low_performance: u8,
    pub(super) low_engagement: u8,
    pub(super) has_previous_attempts: u8,
}

impl FeatureVector {
    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    /// Value at a layout index
    pub fn value(&self, index: usize) -> Option<FeatureValue> {
        let value = match index {
            0 => FeatureValue::Real(self.avg_grade),
            1 => FeatureValue::Real(self.grade_consistency),
            2 => FeatureValue::Real(self.grade_range),
            3 => FeatureValue::Integer(self.num_assessments),
            4 => FeatureValue::Real(self.assessment_completion_rate),
            5 => FeatureValue::Integer(self.studied_credits),
            6 => FeatureValue::Integer(self.num_of_prev_attempts),
            7 => FeatureValue::Integer(self.low_performance as u64),
            8 => FeatureValue::Integer(self.low_engagement as u64),
            9 => FeatureValue::Integer(self.has_previous_attempts as u64),
            _ => return None,
        };
        Some(value)
    }

    /// Dense model input in layout order
    pub fn to_model_input(&self) -> ModelInput {
        let mut values = [0.0f64; FEATURE_COUNT];
        for (i, slot) in values.iter_mut().enumerate() {
            if let Some(v) = self.value(i) {
                *slot = v.as_f64();
            }
        }
        ModelInput(values)
    }
}

// ============================================================================
// MODEL INPUT
// ============================================================================

/// Layout-ordered feature values handed to a `RiskModel`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelInput(pub(crate) [f64; FEATURE_COUNT]);

impl ModelInput {
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Copy with one feature replaced (used by occlusion attribution)
    pub fn with_feature(&self, index: usize, value: f64) -> Self {
        let mut values = self.0;
        if index < FEATURE_COUNT {
            values[index] = value;
        }
        ModelInput(values)
    }

    /// (name, value) pairs in layout order
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<&FeatureVector> for ModelInput {
    fn from(vector: &FeatureVector) -> Self {
        vector.to_model_input()
    }
}
