//! EduMind Risk Core
//!
//! Explainable risk-assessment engine: maps a student's academic/engagement
//! feature vector to a probability distribution, a composite risk score,
//! ranked impact factors and prioritized recommendations.
//!
//! ## Pipeline
//! ```text
//! raw JSON ─▶ features::validate ─▶ model::RiskModel ─▶ risk::score
//!                                                        │
//!                                  explain::rank ◀───────┘
//!                                        │
//!                     ┌──────────────────┴──────────────────┐
//!              benchmark::compare                 recommend::synthesize
//!                     └──────────────▶ RiskAssessment ◀──────┘
//! ```

pub mod api;
pub mod constants;
pub mod logic;

pub use logic::assessment::{RiskAssessment, RiskEngine};
pub use logic::catalog::AdvisoryCatalog;
pub use logic::error::EngineError;
pub use logic::features::{FeatureVector, ValidationError};
pub use logic::model::{load_model, ModelSource, RiskModel};
