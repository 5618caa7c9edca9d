use std::cmp::Ordering;

use super::tiers::{tier_for, TOP_N};
use super::types::{AttributionMethod, FeatureContribution, ImpactTier, RankedFactor};
use crate::logic::catalog::AdvisoryCatalog;
use crate::logic::features::{FeatureVector, ModelInput, FEATURE_COUNT, FEATURE_LAYOUT};
use crate::logic::model::{InferenceError, RiskModel};
use crate::logic::risk::RiskLevel;

// Keeps logit finite at p = 0 or 1
const LOGIT_EPSILON: f64 = 1e-6;

fn logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPSILON, 1.0 - LOGIT_EPSILON);
    (p / (1.0 - p)).ln()
}

/// Signed per-feature contributions toward risk.
///
/// Uses the model's native attribution when it has one; otherwise occludes
/// each feature with its catalog baseline and measures the change in the
/// risk log-odds.
pub fn attribute(
    model: &dyn RiskModel,
    vector: &FeatureVector,
    risk_score: f64,
    catalog: &AdvisoryCatalog,
) -> Result<(AttributionMethod, Vec<FeatureContribution>), InferenceError> {
    let input = ModelInput::from(vector);

    let (method, raw) = match model.attributions(&input) {
        Some(values) => (AttributionMethod::Native, values),
        None => (AttributionMethod::Occlusion, occlude(model, &input, risk_score, catalog)?),
    };

    let mut contributions = Vec::with_capacity(FEATURE_COUNT);
    for (i, &contribution) in raw.iter().enumerate() {
        if !contribution.is_finite() {
            return Err(InferenceError::ContractViolation(format!(
                "non-finite attribution for '{}'",
                FEATURE_LAYOUT[i]
            )));
        }
        if let Some(value) = vector.value(i) {
            contributions.push(FeatureContribution {
                name: FEATURE_LAYOUT[i],
                value,
                contribution,
            });
        }
    }

    Ok((method, contributions))
}

fn occlude(
    model: &dyn RiskModel,
    input: &ModelInput,
    risk_score: f64,
    catalog: &AdvisoryCatalog,
) -> Result<[f64; FEATURE_COUNT], InferenceError> {
    let base = logit(risk_score);
    let mut out = [0.0f64; FEATURE_COUNT];

    for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
        let baseline = catalog.baseline(name);
        if input.as_array()[i] == baseline {
            continue;
        }
        let perturbed = input.with_feature(i, baseline);
        let p = model.predict(&perturbed)?.into_distribution()?.get(RiskLevel::AtRisk);
        out[i] = base - logit(p);
    }

    Ok(out)
}

/// A tier never contradicts the catalog benchmark: a protective contribution
/// on an unfavorable value, or a risk contribution on a favorable one, is
/// reported as Neutral.
fn reconcile(tier: ImpactTier, favorable: bool) -> ImpactTier {
    match tier {
        ImpactTier::Strength if !favorable => ImpactTier::Neutral,
        t if t.is_concern() && favorable => ImpactTier::Neutral,
        t => t,
    }
}

/// Sort by |contribution| descending, ties by feature name ascending,
/// assign tiers and keep the top N.
pub fn rank(mut contributions: Vec<FeatureContribution>, catalog: &AdvisoryCatalog) -> Vec<RankedFactor> {
    contributions.sort_by(|a, b| {
        b.contribution
            .abs()
            .total_cmp(&a.contribution.abs())
            .then_with(|| a.name.cmp(b.name))
    });

    contributions
        .into_iter()
        .take(TOP_N)
        .map(|c| {
            let tier = tier_for(c.contribution);
            let impact = reconcile(tier, catalog.is_favorable(c.name, c.value.as_f64()));
            if impact != tier {
                log::debug!(
                    "'{}' = {} disagrees with its benchmark ({} -> {})",
                    c.name,
                    c.value,
                    tier,
                    impact
                );
            }

            RankedFactor {
                feature: c.name.to_string(),
                value: c.value,
                impact,
                contribution_weight: c.contribution,
            }
        })
        .collect()
}

/// Ordering used by `rank`, exposed for property checks
pub fn rank_order(a: &RankedFactor, b: &RankedFactor) -> Ordering {
    b.contribution_weight
        .abs()
        .total_cmp(&a.contribution_weight.abs())
        .then_with(|| a.feature.cmp(&b.feature))
}
