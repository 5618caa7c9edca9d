use serde::Serialize;

use crate::logic::catalog::AdvisoryCatalog;
use crate::logic::explain::RankedFactor;
use crate::logic::features::FeatureValue;

/// A value of `baseline * PERFORMANCE_HEADROOM` maps to 100
pub const PERFORMANCE_HEADROOM: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkComparison {
    pub feature: String,
    pub value: FeatureValue,
    pub baseline: f64,
    /// 0-100 display value
    pub performance_level: f64,
    /// `value >= baseline`
    pub above_benchmark: bool,
    /// Above/below adjusted for the feature's direction
    pub favorable: bool,
}

/// `clamp(0, 100, value / (baseline * 1.5) * 100)`.
/// A zero baseline maps 0 to 0 and anything larger to 100.
pub fn performance_level(value: f64, baseline: f64) -> f64 {
    let reference = baseline * PERFORMANCE_HEADROOM;
    if reference <= 0.0 {
        return if value > 0.0 { 100.0 } else { 0.0 };
    }

    let level = (value / reference) * 100.0;
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 100.0)
}

pub fn compare(feature: &str, value: FeatureValue, catalog: &AdvisoryCatalog) -> BenchmarkComparison {
    let baseline = catalog.baseline(feature);
    let v = value.as_f64();

    BenchmarkComparison {
        feature: feature.to_string(),
        value,
        baseline,
        performance_level: performance_level(v, baseline),
        above_benchmark: v >= baseline,
        favorable: catalog.is_favorable(feature, v),
    }
}

/// One comparison per ranked factor, same order
pub fn compare_all(factors: &[RankedFactor], catalog: &AdvisoryCatalog) -> Vec<BenchmarkComparison> {
    factors
        .iter()
        .map(|f| compare(&f.feature, f.value, catalog))
        .collect()
}
