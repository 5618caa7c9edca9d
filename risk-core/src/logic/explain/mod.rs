//! Explain Module - Impact Ranker
//!
//! Turns per-feature attributions into ranked, tiered factors.
//!
//! - `types`: ImpactTier, FeatureContribution, RankedFactor
//! - `tiers`: Fixed tier table and top-N
//! - `engine`: Attribution (native or occlusion) and ranking

pub mod types;
pub mod tiers;
pub mod engine;

pub use types::{AttributionMethod, FeatureContribution, ImpactTier, RankedFactor};
pub use tiers::{tier_for, PROTECTIVE_TIERS, RISK_TIERS, TOP_N};
pub use engine::{attribute, rank, rank_order};
