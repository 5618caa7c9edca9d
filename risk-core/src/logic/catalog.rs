//! Advisory Catalog
//!
//! Versioned per-feature configuration shared by the benchmark comparator
//! and the recommendation synthesizer: baseline value, which direction is
//! favorable, and the advisory text for strengths and for improvements.
//! Loaded once at startup; built-in default when no file is configured.
//!
//! Text may use `{value}` and `{baseline}` placeholders.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Baseline for features with no catalog entry
pub const DEFAULT_BASELINE: f64 = 50.0;

pub const FALLBACK_STRENGTH: &str = "Maintain this positive performance.";
pub const FALLBACK_ACTION: &str = "Focus on improving this area.";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Human-readable feature name
    pub label: String,
    pub baseline: f64,
    pub direction: Direction,
    /// Maintenance advice when the feature is a strength
    pub strength: String,
    /// Improvement advice otherwise
    pub action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryCatalog {
    pub version: String,
    #[serde(default = "default_baseline")]
    pub default_baseline: f64,
    #[serde(default = "fallback_strength")]
    pub fallback_strength: String,
    #[serde(default = "fallback_action")]
    pub fallback_action: String,
    pub entries: BTreeMap<String, CatalogEntry>,
}

fn default_baseline() -> f64 {
    DEFAULT_BASELINE
}

fn fallback_strength() -> String {
    FALLBACK_STRENGTH.to_string()
}

fn fallback_action() -> String {
    FALLBACK_ACTION.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

// ============================================================================
// BUILT-IN CATALOG
// ============================================================================

fn entry(label: &str, baseline: f64, direction: Direction, strength: &str, action: &str) -> CatalogEntry {
    CatalogEntry {
        label: label.to_string(),
        baseline,
        direction,
        strength: strength.to_string(),
        action: action.to_string(),
    }
}

static BUILTIN: Lazy<AdvisoryCatalog> = Lazy::new(|| {
    use Direction::*;

    let entries = [
        ("avg_grade", entry(
            "Average grade", 70.0, HigherIsBetter,
            "Your average grade of {value} meets the benchmark of {baseline}. Keep up your current study routine.",
            "Keep your average grade at or above {baseline}: review feedback on recent assessments and book time with your tutor when a topic is unclear.",
        )),
        ("grade_consistency", entry(
            "Grade consistency", 85.0, HigherIsBetter,
            "Your grades are consistent. Keep the same preparation habits for upcoming assessments.",
            "Aim for steady results: plan a weekly study schedule so preparation does not depend on deadlines.",
        )),
        ("grade_range", entry(
            "Grade range", 30.0, LowerIsBetter,
            "Your best and worst grades are close together. Keep covering every topic evenly.",
            "Keep the gap between your best and worst grades narrow: identify your weakest topics and revisit them first.",
        )),
        ("num_assessments", entry(
            "Assessments submitted", 6.0, HigherIsBetter,
            "You are submitting assessments regularly. Keep submitting on time.",
            "Keep submitting assessments: aim for at least {baseline} this term, starting with the next one due.",
        )),
        ("assessment_completion_rate", entry(
            "Assessment completion rate", 0.8, HigherIsBetter,
            "Your completion rate is strong. Keep completing every assessment.",
            "Complete every remaining assessment. Your completion rate is {value} against a benchmark of {baseline}.",
        )),
        ("studied_credits", entry(
            "Studied credits", 60.0, HigherIsBetter,
            "Your credit load is well managed. Keep balancing it with your available study time.",
            "Review your credit load with an academic advisor to make sure it matches your available study time.",
        )),
        ("num_of_prev_attempts", entry(
            "Previous attempts", 0.0, LowerIsBetter,
            "This is your first attempt at the module. Keep building on a fresh start.",
            "If you are retaking this module, meet your advisor to agree on what to do differently this time.",
        )),
        ("low_performance", entry(
            "Low performance flag", 0.0, LowerIsBetter,
            "No low-performance warning is active. Keep monitoring your grades.",
            "Watch for low-performance warnings: attend support sessions and ask for extra practice material.",
        )),
        ("low_engagement", entry(
            "Low engagement flag", 0.0, LowerIsBetter,
            "Your engagement is healthy. Keep logging in and taking part regularly.",
            "Stay engaged: log in to the learning platform several times a week and join discussions.",
        )),
        ("has_previous_attempts", entry(
            "Repeat enrolment", 0.0, LowerIsBetter,
            "No previous failed attempts. Keep up the momentum.",
            "If this is a repeat enrolment, use the first weeks to close the gaps that caused difficulty last time.",
        )),
    ];

    AdvisoryCatalog {
        version: "builtin-1".to_string(),
        default_baseline: DEFAULT_BASELINE,
        fallback_strength: FALLBACK_STRENGTH.to_string(),
        fallback_action: FALLBACK_ACTION.to_string(),
        entries: entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
    }
});

// ============================================================================
// CATALOG
// ============================================================================

impl Default for AdvisoryCatalog {
    fn default() -> Self {
        BUILTIN.clone()
    }
}

impl AdvisoryCatalog {
    pub fn builtin() -> &'static AdvisoryCatalog {
        &BUILTIN
    }

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog: AdvisoryCatalog = serde_json::from_str(&content)?;
        catalog.validate()?;
        log::info!(
            "Advisory catalog v{} loaded ({} entries)",
            catalog.version,
            catalog.entries.len()
        );
        Ok(catalog)
    }

    /// Load from `CATALOG_PATH`, or the built-in catalog when unset
    pub fn from_env() -> Result<Self, CatalogError> {
        match crate::constants::get_catalog_path() {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version.trim().is_empty() {
            return Err(CatalogError::Invalid("version must not be empty".to_string()));
        }
        if !self.default_baseline.is_finite() || self.default_baseline < 0.0 {
            return Err(CatalogError::Invalid("default_baseline must be finite and >= 0".to_string()));
        }
        for (name, entry) in &self.entries {
            if !entry.baseline.is_finite() || entry.baseline < 0.0 {
                return Err(CatalogError::Invalid(format!(
                    "baseline for '{}' must be finite and >= 0",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn entry(&self, feature: &str) -> Option<&CatalogEntry> {
        self.entries.get(feature)
    }

    /// Baseline for a feature; unknown features get `default_baseline`
    pub fn baseline(&self, feature: &str) -> f64 {
        self.entry(feature).map(|e| e.baseline).unwrap_or(self.default_baseline)
    }

    /// Unknown features are treated as higher-is-better
    pub fn direction(&self, feature: &str) -> Direction {
        self.entry(feature).map(|e| e.direction).unwrap_or(Direction::HigherIsBetter)
    }

    /// Whether `value` sits on the good side of the feature's benchmark.
    /// The benchmark itself counts as favorable in both directions.
    pub fn is_favorable(&self, feature: &str, value: f64) -> bool {
        let baseline = self.baseline(feature);
        match self.direction(feature) {
            Direction::HigherIsBetter => value >= baseline,
            Direction::LowerIsBetter => value <= baseline,
        }
    }

    /// Display label; unknown features get a title-cased name
    pub fn label(&self, feature: &str) -> String {
        match self.entry(feature) {
            Some(e) => e.label.clone(),
            None => title_case(feature),
        }
    }
}

/// `assessment_completion_rate` → `Assessment Completion Rate`
pub fn title_case(feature: &str) -> String {
    feature
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// TESTS
// ============================================================================
