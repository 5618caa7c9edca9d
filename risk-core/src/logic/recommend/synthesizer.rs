use super::types::{priority_for_rank, ActionItem};
use crate::logic::catalog::AdvisoryCatalog;
use crate::logic::explain::{ImpactTier, RankedFactor};
use crate::logic::features::FeatureValue;

/// Fill `{value}` and `{baseline}` placeholders
pub fn render(template: &str, value: FeatureValue, baseline: f64) -> String {
    template
        .replace("{value}", &value.to_string())
        .replace("{baseline}", &FeatureValue::Real(baseline).to_string())
}

/// One action item per factor, in factor order.
/// Strengths get maintenance text, everything else improvement text.
pub fn synthesize(factors: &[RankedFactor], catalog: &AdvisoryCatalog) -> Vec<ActionItem> {
    factors
        .iter()
        .enumerate()
        .map(|(rank, factor)| {
            let entry = catalog.entry(&factor.feature);
            let template = match (factor.impact, entry) {
                (ImpactTier::Strength, Some(e)) => e.strength.as_str(),
                (ImpactTier::Strength, None) => catalog.fallback_strength.as_str(),
                (_, Some(e)) => e.action.as_str(),
                (_, None) => catalog.fallback_action.as_str(),
            };

            ActionItem {
                priority: priority_for_rank(rank),
                feature: factor.feature.clone(),
                text: render(template, factor.value, catalog.baseline(&factor.feature)),
            }
        })
        .collect()
}
