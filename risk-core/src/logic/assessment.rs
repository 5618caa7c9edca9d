//! Risk Assessment Pipeline
//!
//! Validator → Model → Risk Scorer → Impact Ranker → (Benchmark, Recommendations).
//!
//! The engine holds no mutable state: the model and catalog are shared
//! read-only through `Arc`, and a failure at any stage returns no result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;

use super::benchmark::{compare_all, BenchmarkComparison};
use super::catalog::AdvisoryCatalog;
use super::error::{EngineError, Stage};
use super::explain::{attribute, rank, ImpactTier, RankedFactor};
use super::features::{validate, FeatureVector, ModelInput};
use super::model::{ModelMetadata, RiskModel};
use super::recommend::{synthesize, ActionItem};
use super::risk::{score, ProbabilityDistribution, RiskLevel};

// ============================================================================
// OUTPUT
// ============================================================================

/// Engine output; immutable and deterministic for a given input and model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub student_id: String,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub predicted_class: RiskLevel,
    pub confidence: f64,
    pub probabilities: ProbabilityDistribution,
    pub top_risk_factors: Vec<RankedFactor>,
    pub recommendations: Vec<String>,
    pub action_items: Vec<ActionItem>,
    pub benchmarks: Vec<BenchmarkComparison>,
    pub summary: String,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RiskEngine {
    model: Arc<dyn RiskModel>,
    catalog: Arc<AdvisoryCatalog>,
}

impl RiskEngine {
    pub fn new(model: Arc<dyn RiskModel>, catalog: Arc<AdvisoryCatalog>) -> Self {
        Self { model, catalog }
    }

    pub fn model_metadata(&self) -> &ModelMetadata {
        self.model.metadata()
    }

    pub fn catalog(&self) -> &AdvisoryCatalog {
        &self.catalog
    }

    /// Validate a raw record and assess it
    pub fn assess(&self, raw: &Value) -> Result<RiskAssessment, EngineError> {
        let vector = validate(raw)?;
        self.assess_vector(&vector)
    }

    /// Assess an already validated vector
    pub fn assess_vector(&self, vector: &FeatureVector) -> Result<RiskAssessment, EngineError> {
        let distribution = self.infer(vector)?;
        self.explain(vector, distribution)
    }

    /// Like `assess`, but inference and attribution run on the blocking pool
    /// and must finish within `timeout`. An abandoned job keeps running to
    /// completion on its thread; its result is dropped.
    pub async fn assess_with_timeout(
        self: &Arc<Self>,
        raw: &Value,
        timeout: Duration,
    ) -> Result<RiskAssessment, EngineError> {
        let vector = validate(raw)?;

        let engine = Arc::clone(self);
        let job_vector = vector.clone();
        let started = Instant::now();
        let job = tokio::task::spawn_blocking(move || engine.assess_vector(&job_vector));

        match tokio::time::timeout(timeout, job).await {
            Err(_) => {
                log::warn!(
                    "Assessment for '{}' exceeded {} ms",
                    vector.student_id(),
                    timeout.as_millis()
                );
                Err(EngineError::InferenceTimeout {
                    stage: Stage::Inference,
                    elapsed_ms: started.elapsed().as_millis() as u64,
                })
            }
            Ok(Err(join_err)) => Err(EngineError::InferenceUnavailable {
                stage: Stage::Inference,
                reason: format!("inference task failed: {}", join_err),
            }),
            Ok(Ok(result)) => result,
        }
    }

    fn infer(&self, vector: &FeatureVector) -> Result<ProbabilityDistribution, EngineError> {
        self.model
            .predict(&ModelInput::from(vector))
            .and_then(|raw| raw.into_distribution())
            .map_err(|e| EngineError::from_inference(Stage::Inference, e))
    }

    fn explain(
        &self,
        vector: &FeatureVector,
        probabilities: ProbabilityDistribution,
    ) -> Result<RiskAssessment, EngineError> {
        let risk = score(&probabilities);

        let (method, contributions) = attribute(self.model.as_ref(), vector, risk.risk_score, &self.catalog)
            .map_err(|e| EngineError::from_inference(Stage::Attribution, e))?;

        let factors = rank(contributions, &self.catalog);
        let benchmarks = compare_all(&factors, &self.catalog);
        let action_items = synthesize(&factors, &self.catalog);
        let recommendations = action_items.iter().map(|a| a.text.clone()).collect();

        let predicted_class = probabilities.predicted_class();
        let confidence = probabilities.get(predicted_class);
        let summary = summarize(predicted_class, confidence, &factors, &self.catalog);

        log::debug!(
            "Assessed '{}': score={:.3} level={} attribution={:?}",
            vector.student_id(),
            risk.risk_score,
            risk.risk_level,
            method
        );

        Ok(RiskAssessment {
            student_id: vector.student_id().to_string(),
            risk_score: risk.risk_score,
            risk_level: risk.risk_level,
            predicted_class,
            confidence,
            probabilities,
            top_risk_factors: factors,
            recommendations,
            action_items,
            benchmarks,
            summary,
        })
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

fn confidence_word(confidence: f64) -> &'static str {
    if confidence >= 0.8 {
        "high"
    } else if confidence >= 0.6 {
        "moderate"
    } else {
        "low"
    }
}

/// Natural-language explanation: predicted class, confidence, up to three
/// strengths and up to three concerns, in rank order.
pub fn summarize(
    predicted_class: RiskLevel,
    confidence: f64,
    factors: &[RankedFactor],
    catalog: &AdvisoryCatalog,
) -> String {
    let mut summary = format!(
        "The student is predicted to be {} with {} confidence ({:.1}% probability).",
        predicted_class,
        confidence_word(confidence),
        confidence * 100.0
    );

    let strengths: Vec<String> = factors
        .iter()
        .filter(|f| f.impact == ImpactTier::Strength)
        .take(3)
        .map(|f| catalog.label(&f.feature).to_lowercase())
        .collect();
    let concerns: Vec<String> = factors
        .iter()
        .filter(|f| f.impact.is_concern())
        .take(3)
        .map(|f| catalog.label(&f.feature).to_lowercase())
        .collect();

    if !strengths.is_empty() {
        summary.push_str(&format!(" Key strengths: {}.", strengths.join(", ")));
    }
    if !concerns.is_empty() {
        summary.push_str(&format!(" Areas of concern: {}.", concerns.join(", ")));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FeatureValue;

    fn factor(feature: &str, impact: ImpactTier) -> RankedFactor {
        RankedFactor {
            feature: feature.to_string(),
            value: FeatureValue::Integer(1),
            impact,
            contribution_weight: 0.0,
        }
    }

    #[test]
    fn test_summary_wording() {
        let catalog = AdvisoryCatalog::builtin();
        let text = summarize(
            RiskLevel::AtRisk,
            0.91,
            &[
                factor("avg_grade", ImpactTier::Critical),
                factor("grade_range", ImpactTier::Strength),
                factor("low_engagement", ImpactTier::High),
                factor("studied_credits", ImpactTier::Neutral),
            ],
            catalog,
        );
        assert_eq!(
            text,
            "The student is predicted to be At-Risk with high confidence (91.0% probability). \
             Key strengths: grade range. Areas of concern: average grade, low engagement flag."
        );
    }

    #[test]
    fn test_confidence_words() {
        assert_eq!(confidence_word(0.8), "high");
        assert_eq!(confidence_word(0.6), "moderate");
        assert_eq!(confidence_word(0.59), "low");
    }
}
