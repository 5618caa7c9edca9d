//! Risk Module
//!
//! Derives the composite risk score and the discrete risk level
//! from the model's probability distribution.
//!
//! ## Structure
//! - `types`: RiskLevel, ProbabilityDistribution
//! - `rules`: Fixed band thresholds
//! - `scorer`: Score and level derivation (the only place a score becomes a level)

pub mod types;
pub mod rules;
pub mod scorer;

pub use types::{ProbabilityDistribution, RiskLevel, PROBABILITY_TOLERANCE};
pub use rules::{AT_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};
pub use scorer::{level_for, score, RiskScore};
