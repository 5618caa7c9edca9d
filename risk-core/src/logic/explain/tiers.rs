//! Impact Tier Table
//!
//! Fixed magnitude bounds, calibrated once in log-odds units.
//! Bounds are inclusive and evaluated top-down; first match wins.

use super::types::ImpactTier;

/// Risk-increasing contributions (positive sign)
pub const RISK_TIERS: &[(f64, ImpactTier)] = &[
    (1.50, ImpactTier::Critical),
    (0.75, ImpactTier::High),
    (0.30, ImpactTier::Medium),
    (0.05, ImpactTier::Low),
];

/// Protective contributions (negative sign), by magnitude
pub const PROTECTIVE_TIERS: &[(f64, ImpactTier)] = &[
    (0.05, ImpactTier::Strength),
];

/// Number of factors kept after ranking
pub const TOP_N: usize = 6;

/// Tier for one signed contribution
pub fn tier_for(contribution: f64) -> ImpactTier {
    let magnitude = contribution.abs();
    let table = if contribution > 0.0 { RISK_TIERS } else { PROTECTIVE_TIERS };

    table
        .iter()
        .find(|(bound, _)| magnitude >= *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(ImpactTier::Neutral)
}
