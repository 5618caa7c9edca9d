use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureValue;

/// Qualitative label for a feature's contribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactTier {
    Critical,
    High,
    Medium,
    Low,
    Strength,
    Neutral,
}

impl ImpactTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactTier::Critical => "Critical",
            ImpactTier::High => "High",
            ImpactTier::Medium => "Medium",
            ImpactTier::Low => "Low",
            ImpactTier::Strength => "Strength",
            ImpactTier::Neutral => "Neutral",
        }
    }

    /// Risk-increasing tiers (Critical..Low)
    pub fn is_concern(&self) -> bool {
        matches!(self, ImpactTier::Critical | ImpactTier::High | ImpactTier::Medium | ImpactTier::Low)
    }
}

impl std::fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How contributions were obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMethod {
    /// Model's own additive attribution
    Native,
    /// Replace one feature at a time with its baseline
    Occlusion,
}

/// Signed contribution toward risk, log-odds units
#[derive(Debug, Clone, Serialize)]
pub struct FeatureContribution {
    pub name: &'static str,
    pub value: FeatureValue,
    pub contribution: f64,
}

/// One entry of `top_risk_factors`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFactor {
    pub feature: String,
    pub value: FeatureValue,
    pub impact: ImpactTier,
    /// Signed contribution, used for ordering only
    #[serde(skip)]
    pub contribution_weight: f64,
}
