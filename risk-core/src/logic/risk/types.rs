//! Risk Types
//!
//! Core types for risk scoring. No decision logic here.

use serde::{Deserialize, Serialize};

use crate::logic::model::InferenceError;

/// Allowed deviation of a distribution's sum from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-3;

// ============================================================================
// RISK LEVEL
// ============================================================================

/// Canonical risk classes, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "Safe")]
    Safe,
    #[serde(rename = "Medium Risk")]
    MediumRisk,
    #[serde(rename = "At-Risk")]
    AtRisk,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Safe, RiskLevel::MediumRisk, RiskLevel::AtRisk];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "Safe",
            RiskLevel::MediumRisk => "Medium Risk",
            RiskLevel::AtRisk => "At-Risk",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Safe" => Some(RiskLevel::Safe),
            "Medium Risk" => Some(RiskLevel::MediumRisk),
            "At-Risk" => Some(RiskLevel::AtRisk),
            _ => None,
        }
    }

    pub fn severity_level(&self) -> u8 {
        match self {
            RiskLevel::Safe => 0,
            RiskLevel::MediumRisk => 1,
            RiskLevel::AtRisk => 2,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PROBABILITY DISTRIBUTION
// ============================================================================

/// Probability per canonical class; always sums to 1 within tolerance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityDistribution {
    #[serde(rename = "Safe")]
    safe: f64,
    #[serde(rename = "Medium Risk")]
    medium_risk: f64,
    #[serde(rename = "At-Risk")]
    at_risk: f64,
}

impl ProbabilityDistribution {
    /// Build from raw model output, enforcing the adapter contract:
    /// 2 classes (Safe, At-Risk) or 3 canonical classes, each probability
    /// finite in [0, 1], summing to 1 within `PROBABILITY_TOLERANCE`.
    pub fn from_model_output(classes: &[String], probabilities: &[f64]) -> Result<Self, InferenceError> {
        if classes.len() != probabilities.len() {
            return Err(InferenceError::ContractViolation(format!(
                "{} class labels but {} probabilities",
                classes.len(),
                probabilities.len()
            )));
        }
        if classes.len() != 2 && classes.len() != 3 {
            return Err(InferenceError::ContractViolation(format!(
                "expected 2 or 3 classes, got {}",
                classes.len()
            )));
        }

        let mut slots: [Option<f64>; 3] = [None; 3];
        for (label, &p) in classes.iter().zip(probabilities) {
            let level = RiskLevel::from_label(label).ok_or_else(|| {
                InferenceError::ContractViolation(format!("unknown class label '{}'", label))
            })?;
            if !p.is_finite() || !(0.0..=1.0).contains(&p) {
                return Err(InferenceError::ContractViolation(format!(
                    "probability for '{}' is {} (outside [0, 1])",
                    label, p
                )));
            }
            let slot = &mut slots[level.severity_level() as usize];
            if slot.is_some() {
                return Err(InferenceError::ContractViolation(format!("duplicate class label '{}'", label)));
            }
            *slot = Some(p);
        }

        if classes.len() == 2 && slots[RiskLevel::MediumRisk.severity_level() as usize].is_some() {
            return Err(InferenceError::ContractViolation(
                "binary models must report Safe and At-Risk".to_string(),
            ));
        }

        let dist = Self {
            safe: slots[0].unwrap_or(0.0),
            medium_risk: slots[1].unwrap_or(0.0),
            at_risk: slots[2].unwrap_or(0.0),
        };

        let sum = dist.sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(InferenceError::ContractViolation(format!(
                "probabilities sum to {:.4}, expected 1",
                sum
            )));
        }

        Ok(dist)
    }

    pub fn get(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::Safe => self.safe,
            RiskLevel::MediumRisk => self.medium_risk,
            RiskLevel::AtRisk => self.at_risk,
        }
    }

    pub fn sum(&self) -> f64 {
        self.safe + self.medium_risk + self.at_risk
    }

    /// Class with the highest probability; ties resolve to the more severe class
    pub fn predicted_class(&self) -> RiskLevel {
        let mut best = RiskLevel::Safe;
        for level in RiskLevel::ALL {
            if self.get(level) >= self.get(best) {
                best = level;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_three_class_distribution() {
        let d = ProbabilityDistribution::from_model_output(
            &labels(&["Safe", "Medium Risk", "At-Risk"]),
            &[0.2, 0.3, 0.5],
        )
        .unwrap();
        assert_eq!(d.get(RiskLevel::AtRisk), 0.5);
        assert_eq!(d.predicted_class(), RiskLevel::AtRisk);
        assert!((d.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE);
    }

    #[test]
    fn test_label_order_does_not_matter() {
        let d = ProbabilityDistribution::from_model_output(
            &labels(&["At-Risk", "Safe", "Medium Risk"]),
            &[0.1, 0.7, 0.2],
        )
        .unwrap();
        assert_eq!(d.get(RiskLevel::Safe), 0.7);
        assert_eq!(d.get(RiskLevel::AtRisk), 0.1);
    }

    #[test]
    fn test_binary_distribution_maps_to_canonical_set() {
        let d = ProbabilityDistribution::from_model_output(&labels(&["Safe", "At-Risk"]), &[0.35, 0.65]).unwrap();
        assert_eq!(d.get(RiskLevel::MediumRisk), 0.0);
        assert_eq!(d.get(RiskLevel::AtRisk), 0.65);

        let json = serde_json::to_value(d).unwrap();
        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_sum_violation() {
        let err = ProbabilityDistribution::from_model_output(
            &labels(&["Safe", "Medium Risk", "At-Risk"]),
            &[0.2, 0.3, 0.3],
        )
        .unwrap_err();
        assert!(matches!(err, InferenceError::ContractViolation(_)));
    }

    #[test]
    fn test_within_tolerance_accepted() {
        assert!(ProbabilityDistribution::from_model_output(
            &labels(&["Safe", "Medium Risk", "At-Risk"]),
            &[0.2, 0.3, 0.5005],
        )
        .is_ok());
    }

    #[test]
    fn test_wrong_class_count_and_labels() {
        let four = ProbabilityDistribution::from_model_output(
            &labels(&["Safe", "Medium Risk", "At-Risk", "Withdrawn"]),
            &[0.25; 4],
        );
        assert!(four.is_err());

        let unknown = ProbabilityDistribution::from_model_output(&labels(&["Pass", "Fail"]), &[0.5, 0.5]);
        assert!(unknown.is_err());

        let duplicate = ProbabilityDistribution::from_model_output(&labels(&["Safe", "Safe"]), &[0.5, 0.5]);
        assert!(duplicate.is_err());

        let binary_medium =
            ProbabilityDistribution::from_model_output(&labels(&["Safe", "Medium Risk"]), &[0.5, 0.5]);
        assert!(binary_medium.is_err());

        let mismatched = ProbabilityDistribution::from_model_output(&labels(&["Safe", "At-Risk"]), &[1.0]);
        assert!(mismatched.is_err());
    }

    #[test]
    fn test_non_finite_probability() {
        let err = ProbabilityDistribution::from_model_output(&labels(&["Safe", "At-Risk"]), &[f64::NAN, 1.0]);
        assert!(err.is_err());
    }

    #[test]
    fn test_tie_resolves_to_more_severe_class() {
        let d = ProbabilityDistribution::from_model_output(
            &labels(&["Safe", "Medium Risk", "At-Risk"]),
            &[0.4, 0.4, 0.2],
        )
        .unwrap();
        assert_eq!(d.predicted_class(), RiskLevel::MediumRisk);
    }
}
