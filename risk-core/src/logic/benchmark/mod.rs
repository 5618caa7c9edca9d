//! Benchmark Module - Baseline comparison for ranked factors
//!
//! Reads baselines from the same `AdvisoryCatalog` as the recommendation
//! synthesizer, so both agree on what is favorable.

pub mod comparator;

pub use comparator::{compare, compare_all, performance_level, BenchmarkComparison, PERFORMANCE_HEADROOM};
