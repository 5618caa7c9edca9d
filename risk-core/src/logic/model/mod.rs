//! Model Module - Inference boundary
//!
//! Keeps inference separate from the rest of the pipeline.
//! Swap the model without touching scoring or explanation.

pub mod inference;
pub mod linear;
pub mod remote;

pub use inference::{load_model, InferenceError, ModelMetadata, ModelSource, RawPrediction, RiskModel};
pub use linear::{LinearArtifact, LinearRiskModel};
pub use remote::RemoteRiskModel;
