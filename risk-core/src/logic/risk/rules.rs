//! Risk Band Thresholds
//!
//! Fixed constants, not configurable per request.
//! Each band includes its lower bound.

/// At or above this score = Medium Risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.40;

/// At or above this score = At-Risk
pub const AT_RISK_THRESHOLD: f64 = 0.70;
