//! Recommend Module - Recommendation Synthesizer
//!
//! Deterministic mapping from ranked factors to advisory text.
//! Priority comes from rank position only, never from impact magnitude.

pub mod types;
pub mod synthesizer;

pub use types::{priority_for_rank, ActionItem, Priority, PRIORITY_BANDS};
pub use synthesizer::{render, synthesize};
