//! Risk Scorer
//!
//! Input: ProbabilityDistribution
//! Output: RiskScore (score + level)

use serde::Serialize;

use super::rules::{AT_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
use super::types::{ProbabilityDistribution, RiskLevel};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskScore {
    pub risk_score: f64,
    pub risk_level: RiskLevel,
}

/// Risk score = probability mass of the most severe class.
/// For binary models this is the positive (At-Risk) class.
pub fn score(distribution: &ProbabilityDistribution) -> RiskScore {
    let risk_score = distribution.get(RiskLevel::AtRisk).clamp(0.0, 1.0);
    RiskScore {
        risk_score,
        risk_level: level_for(risk_score),
    }
}

/// Band a score; ties at a threshold resolve to the higher band
pub fn level_for(risk_score: f64) -> RiskLevel {
    if risk_score >= AT_RISK_THRESHOLD {
        RiskLevel::AtRisk
    } else if risk_score >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::MediumRisk
    } else {
        RiskLevel::Safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        assert_eq!(level_for(0.0), RiskLevel::Safe);
        assert_eq!(level_for(0.399_999), RiskLevel::Safe);
        assert_eq!(level_for(0.40), RiskLevel::MediumRisk);
        assert_eq!(level_for(0.55), RiskLevel::MediumRisk);
        assert_eq!(level_for(0.699_999), RiskLevel::MediumRisk);
        assert_eq!(level_for(0.70), RiskLevel::AtRisk);
        assert_eq!(level_for(1.0), RiskLevel::AtRisk);
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = RiskLevel::Safe;
        for i in 0..=1000 {
            let level = level_for(i as f64 / 1000.0);
            assert!(level >= previous);
            previous = level;
        }
    }

    #[test]
    fn test_score_uses_at_risk_mass() {
        let classes: Vec<String> = ["Safe", "Medium Risk", "At-Risk"].iter().map(|s| s.to_string()).collect();
        let dist = ProbabilityDistribution::from_model_output(&classes, &[0.1, 0.6, 0.3]).unwrap();
        let s = score(&dist);
        assert_eq!(s.risk_score, 0.3);
        // Level follows the score, not the argmax class
        assert_eq!(s.risk_level, RiskLevel::Safe);
    }
}
