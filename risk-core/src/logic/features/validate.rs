//! Feature Validator
//!
//! Converts a raw request record into a `FeatureVector`, field by field.
//! Out-of-range values are rejected, never clamped. Numbers are never
//! read from strings or booleans.

use serde::Serialize;
use serde_json::{Map, Value};

use super::layout::FEATURE_LAYOUT;
use super::vector::FeatureVector;

// ============================================================================
// ERRORS
// ============================================================================

/// Which constraint a field violated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// Required field absent (or null)
    Missing,
    /// JSON type does not match (e.g. string where a number is required)
    WrongType { expected: &'static str },
    /// NaN or infinite
    NotFinite,
    OutOfRange { min: f64, max: f64 },
    /// Fractional value in an integer field
    NotInteger,
    /// Flag other than 0 or 1
    NotBinary,
    /// Empty identifier
    Empty,
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Missing => write!(f, "required field is missing"),
            Constraint::WrongType { expected } => write!(f, "expected {}", expected),
            Constraint::NotFinite => write!(f, "value must be finite"),
            Constraint::OutOfRange { min, max } if max.is_infinite() => {
                write!(f, "value must be >= {}", min)
            }
            Constraint::OutOfRange { min, max } => {
                write!(f, "value must be within [{}, {}]", min, max)
            }
            Constraint::NotInteger => write!(f, "value must be a whole number"),
            Constraint::NotBinary => write!(f, "flag must be 0 or 1"),
            Constraint::Empty => write!(f, "value must not be empty"),
        }
    }
}

/// Bad input shape or range
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize)]
#[error("invalid field '{field}': {constraint}")]
pub struct ValidationError {
    pub field: String,
    pub constraint: Constraint,
}

impl ValidationError {
    fn new(field: &str, constraint: Constraint) -> Self {
        Self { field: field.to_string(), constraint }
    }
}

// ============================================================================
// FIELD READERS
// ============================================================================

fn required<'a>(record: &'a Map<String, Value>, field: &str) -> Result<&'a Value, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(field, Constraint::Missing)),
        Some(v) => Ok(v),
    }
}

fn number(record: &Map<String, Value>, field: &str) -> Result<f64, ValidationError> {
    let value = required(record, field)?;
    let n = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ValidationError::new(field, Constraint::NotFinite))?,
        _ => return Err(ValidationError::new(field, Constraint::WrongType { expected: "number" })),
    };

    if !n.is_finite() {
        return Err(ValidationError::new(field, Constraint::NotFinite));
    }
    Ok(n)
}

fn real(record: &Map<String, Value>, field: &str, min: f64, max: f64) -> Result<f64, ValidationError> {
    let n = number(record, field)?;
    if n < min || n > max {
        return Err(ValidationError::new(field, Constraint::OutOfRange { min, max }));
    }
    Ok(n)
}

fn count(record: &Map<String, Value>, field: &str) -> Result<u64, ValidationError> {
    let value = required(record, field)?;
    if let Value::Number(n) = value {
        if let Some(u) = n.as_u64() {
            return Ok(u);
        }
        if n.as_i64().is_some() {
            return Err(ValidationError::new(field, Constraint::OutOfRange { min: 0.0, max: f64::INFINITY }));
        }
    }

    // Integral floats ("5.0") are accepted; anything else is not.
    let n = number(record, field)?;
    if n < 0.0 {
        return Err(ValidationError::new(field, Constraint::OutOfRange { min: 0.0, max: f64::INFINITY }));
    }
    if n.fract() != 0.0 || n > u64::MAX as f64 {
        return Err(ValidationError::new(field, Constraint::NotInteger));
    }
    Ok(n as u64)
}

fn flag(record: &Map<String, Value>, field: &str) -> Result<u8, ValidationError> {
    let n = number(record, field)?;
    if n == 0.0 {
        Ok(0)
    } else if n == 1.0 {
        Ok(1)
    } else {
        Err(ValidationError::new(field, Constraint::NotBinary))
    }
}

fn identifier(record: &Map<String, Value>, field: &str) -> Result<String, ValidationError> {
    match required(record, field)? {
        Value::String(s) if s.trim().is_empty() => Err(ValidationError::new(field, Constraint::Empty)),
        Value::String(s) => Ok(s.clone()),
        _ => Err(ValidationError::new(field, Constraint::WrongType { expected: "string" })),
    }
}

// ============================================================================
// VALIDATOR
// ============================================================================

const ID_FIELD: &str = "student_id";

fn is_known_field(key: &str) -> bool {
    key == ID_FIELD || FEATURE_LAYOUT.contains(&key)
}

/// Validate a raw JSON record
pub fn validate(raw: &Value) -> Result<FeatureVector, ValidationError> {
    match raw {
        Value::Object(record) => validate_record(record),
        _ => Err(ValidationError::new("$", Constraint::WrongType { expected: "object" })),
    }
}

/// Validate a raw record, reporting the first offending field in layout order
pub fn validate_record(record: &Map<String, Value>) -> Result<FeatureVector, ValidationError> {
    for key in record.keys() {
        if !is_known_field(key) {
            log::debug!("Ignoring unknown field '{}'", key);
        }
    }

    Ok(FeatureVector {
        student_id: identifier(record, ID_FIELD)?,
        avg_grade: real(record, "avg_grade", 0.0, 100.0)?,
        grade_consistency: real(record, "grade_consistency", 0.0, 100.0)?,
        grade_range: real(record, "grade_range", 0.0, 100.0)?,
        num_assessments: count(record, "num_assessments")?,
        assessment_completion_rate: real(record, "assessment_completion_rate", 0.0, 1.0)?,
        studied_credits: count(record, "studied_credits")?,
        num_of_prev_attempts: count(record, "num_of_prev_attempts")?,
        low_performance: flag(record, "low_performance")?,
        low_engagement: flag(record, "low_engagement")?,
        has_previous_attempts: flag(record, "has_previous_attempts")?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
