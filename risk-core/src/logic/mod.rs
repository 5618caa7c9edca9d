//! Logic Module - Engine Components
//!
//! Leaf-first:
//! - `features/` - Feature layout and validation
//! - `model/` - Model adapter boundary (linear, remote)
//! - `risk/` - Risk score and risk level
//! - `explain/` - Impact ranking and tiers
//! - `benchmark/` - Baseline comparison
//! - `recommend/` - Recommendation synthesis
//! - `assessment` - Pipeline that merges everything into one response

pub mod error;
pub mod catalog;
pub mod features;
pub mod model;
pub mod risk;
pub mod explain;
pub mod benchmark;
pub mod recommend;
pub mod assessment;

#[cfg(test)]
mod tests;
