//! Integration Tests for the assessment pipeline
//!
//! Exercises the full engine (validator → model → scorer → ranker →
//! benchmark / recommendations) against the built-in model and stub adapters.

#[cfg(test)]
mod integration_tests {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};

    use crate::logic::assessment::RiskEngine;
    use crate::logic::catalog::AdvisoryCatalog;
    use crate::logic::error::{EngineError, Stage};
    use crate::logic::explain::{rank_order, ImpactTier, TOP_N};
    use crate::logic::features::{validate, ModelInput, FEATURE_COUNT, FEATURE_LAYOUT};
    use crate::logic::model::{InferenceError, LinearRiskModel, ModelMetadata, RawPrediction, RiskModel};
    use crate::logic::risk::{level_for, RiskLevel, PROBABILITY_TOLERANCE};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn engine() -> RiskEngine {
        init_logging();
        RiskEngine::new(Arc::new(LinearRiskModel::builtin()), Arc::new(AdvisoryCatalog::default()))
    }

    fn engine_with(model: impl RiskModel + 'static) -> RiskEngine {
        init_logging();
        RiskEngine::new(Arc::new(model), Arc::new(AdvisoryCatalog::default()))
    }

    fn struggling_student() -> Value {
        json!({
            "student_id": "s-at-risk",
            "avg_grade": 30,
            "grade_consistency": 40,
            "grade_range": 40,
            "num_assessments": 4,
            "assessment_completion_rate": 0.3,
            "studied_credits": 60,
            "num_of_prev_attempts": 0,
            "low_performance": 0,
            "low_engagement": 1,
            "has_previous_attempts": 0
        })
    }

    fn thriving_student() -> Value {
        json!({
            "student_id": "s-safe",
            "avg_grade": 95,
            "grade_consistency": 95,
            "grade_range": 5,
            "num_assessments": 9,
            "assessment_completion_rate": 0.98,
            "studied_credits": 60,
            "num_of_prev_attempts": 0,
            "low_performance": 0,
            "low_engagement": 0,
            "has_previous_attempts": 0
        })
    }

    fn medium_student() -> Value {
        json!({
            "student_id": "s-medium",
            "avg_grade": 65,
            "grade_consistency": 82,
            "grade_range": 30,
            "num_assessments": 6,
            "assessment_completion_rate": 0.6,
            "studied_credits": 80,
            "num_of_prev_attempts": 1,
            "low_performance": 0,
            "low_engagement": 0,
            "has_previous_attempts": 1
        })
    }

    // ------------------------------------------------------------------
    // Stub adapters
    // ------------------------------------------------------------------

    /// Returns fixed output; no native attribution
    struct FixedModel {
        meta: ModelMetadata,
        classes: Vec<&'static str>,
        probabilities: Vec<f64>,
    }

    impl FixedModel {
        fn new(classes: Vec<&'static str>, probabilities: Vec<f64>) -> Self {
            Self {
                meta: LinearRiskModel::builtin().metadata().clone(),
                classes,
                probabilities,
            }
        }
    }

    impl RiskModel for FixedModel {
        fn metadata(&self) -> &ModelMetadata {
            &self.meta
        }
        fn predict(&self, _input: &ModelInput) -> Result<RawPrediction, InferenceError> {
            Ok(RawPrediction {
                classes: self.classes.iter().map(|s| s.to_string()).collect(),
                probabilities: self.probabilities.clone(),
            })
        }
    }

    struct DownModel(ModelMetadata);

    impl RiskModel for DownModel {
        fn metadata(&self) -> &ModelMetadata {
            &self.0
        }
        fn predict(&self, _input: &ModelInput) -> Result<RawPrediction, InferenceError> {
            Err(InferenceError::Unavailable("connection refused".to_string()))
        }
    }

    struct SlowModel {
        inner: LinearRiskModel,
        delay: Duration,
    }

    impl RiskModel for SlowModel {
        fn metadata(&self) -> &ModelMetadata {
            self.inner.metadata()
        }
        fn predict(&self, input: &ModelInput) -> Result<RawPrediction, InferenceError> {
            std::thread::sleep(self.delay);
            self.inner.predict(input)
        }
    }

    /// Delegates predictions but hides native attribution; counts calls
    struct OpaqueModel {
        inner: LinearRiskModel,
        calls: Arc<AtomicUsize>,
    }

    impl RiskModel for OpaqueModel {
        fn metadata(&self) -> &ModelMetadata {
            self.inner.metadata()
        }
        fn predict(&self, input: &ModelInput) -> Result<RawPrediction, InferenceError> {
            self.calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.inner.predict(input)
        }
    }

    /// Native attribution that calls every feature protective
    struct ContrarianModel(LinearRiskModel);

    impl RiskModel for ContrarianModel {
        fn metadata(&self) -> &ModelMetadata {
            self.0.metadata()
        }
        fn predict(&self, input: &ModelInput) -> Result<RawPrediction, InferenceError> {
            self.0.predict(input)
        }
        fn attributions(&self, _input: &ModelInput) -> Option<[f64; FEATURE_COUNT]> {
            Some([-1.0; FEATURE_COUNT])
        }
    }

    fn assert_tiers_agree_with_benchmarks(engine: &RiskEngine, raw: &Value) {
        let result = engine.assess(raw).unwrap();
        for (factor, bench) in result.top_risk_factors.iter().zip(&result.benchmarks) {
            if factor.impact == ImpactTier::Strength {
                assert!(bench.favorable, "{} is a strength below its benchmark", factor.feature);
            }
            if factor.impact.is_concern() {
                assert!(!bench.favorable, "{} is a concern above its benchmark", factor.feature);
            }
        }
    }

    // ------------------------------------------------------------------
    // Scenarios
    // ------------------------------------------------------------------

    #[test]
    fn test_struggling_student_is_at_risk() {
        let result = engine().assess(&struggling_student()).unwrap();

        assert!(result.risk_score >= 0.70, "risk_score = {}", result.risk_score);
        assert_eq!(result.risk_level, RiskLevel::AtRisk);
        assert!(matches!(
            result.top_risk_factors[0].impact,
            ImpactTier::Critical | ImpactTier::High
        ));
    }

    #[test]
    fn test_thriving_student_is_safe_with_strengths() {
        let result = engine().assess(&thriving_student()).unwrap();

        assert_eq!(result.risk_level, RiskLevel::Safe);
        assert!(result.top_risk_factors.iter().any(|f| f.impact == ImpactTier::Strength));
        assert!(result.summary.contains("Key strengths"));
    }

    #[test]
    fn test_medium_student_is_medium_risk() {
        let result = engine().assess(&medium_student()).unwrap();
        assert_eq!(result.risk_level, RiskLevel::MediumRisk);
    }

    #[test]
    fn test_out_of_range_completion_rate_rejected() {
        let mut raw = struggling_student();
        raw["assessment_completion_rate"] = json!(1.5);

        match engine().assess(&raw) {
            Err(EngineError::Validation(e)) => assert_eq!(e.field, "assessment_completion_rate"),
            other => panic!("expected validation error, got {:?}", other.map(|r| r.risk_score)),
        }
    }

    #[test]
    fn test_probabilities_summing_to_point_eight_rejected() {
        let engine = engine_with(FixedModel::new(vec!["Safe", "Medium Risk", "At-Risk"], vec![0.3, 0.3, 0.2]));
        let err = engine.assess(&struggling_student()).unwrap_err();

        assert!(matches!(err, EngineError::InferenceContractViolation { stage: Stage::Inference, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_wrong_class_count_rejected() {
        let engine = engine_with(FixedModel::new(vec!["At-Risk"], vec![1.0]));
        let err = engine.assess(&struggling_student()).unwrap_err();
        assert!(matches!(err, EngineError::InferenceContractViolation { .. }));
    }

    #[test]
    fn test_unavailable_model() {
        let engine = engine_with(DownModel(LinearRiskModel::builtin().metadata().clone()));
        let err = engine.assess(&medium_student()).unwrap_err();
        assert!(matches!(err, EngineError::InferenceUnavailable { .. }));
        assert!(err.is_retryable());
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    #[test]
    fn test_risk_level_matches_thresholds() {
        for raw in [struggling_student(), thriving_student(), medium_student()] {
            let result = engine().assess(&raw).unwrap();
            assert_eq!(result.risk_level, level_for(result.risk_score));
        }
    }

    #[test]
    fn test_probabilities_are_canonical() {
        let result = engine().assess(&medium_student()).unwrap();
        assert!((result.probabilities.sum() - 1.0).abs() <= PROBABILITY_TOLERANCE);

        let json = serde_json::to_value(&result).unwrap();
        let mut keys: Vec<String> = json["probabilities"].as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["At-Risk", "Medium Risk", "Safe"]);
    }

    #[test]
    fn test_binary_model_risk_score() {
        let engine = engine_with(FixedModel::new(vec!["Safe", "At-Risk"], vec![0.25, 0.75]));
        let result = engine.assess(&medium_student()).unwrap();
        assert_eq!(result.risk_score, 0.75);
        assert_eq!(result.risk_level, RiskLevel::AtRisk);
        assert_eq!(result.probabilities.get(RiskLevel::MediumRisk), 0.0);
    }

    #[test]
    fn test_factors_sorted_and_bounded() {
        for raw in [struggling_student(), thriving_student(), medium_student()] {
            let result = engine().assess(&raw).unwrap();
            let factors = &result.top_risk_factors;

            assert!(!factors.is_empty() && factors.len() <= TOP_N);
            for pair in factors.windows(2) {
                assert_ne!(rank_order(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
            }
        }
    }

    #[test]
    fn test_equal_contributions_break_ties_by_name() {
        // Constant model: occlusion yields zero for every feature
        let engine = engine_with(FixedModel::new(vec!["Safe", "Medium Risk", "At-Risk"], vec![0.5, 0.3, 0.2]));
        let result = engine.assess(&medium_student()).unwrap();

        let names: Vec<&str> = result.top_risk_factors.iter().map(|f| f.feature.as_str()).collect();
        let mut expected: Vec<&str> = FEATURE_LAYOUT.to_vec();
        expected.sort();
        expected.truncate(TOP_N);
        assert_eq!(names, expected);
        assert!(result.top_risk_factors.iter().all(|f| f.impact == ImpactTier::Neutral));
    }

    #[test]
    fn test_recommendations_follow_factors() {
        for raw in [struggling_student(), thriving_student(), medium_student()] {
            let result = engine().assess(&raw).unwrap();
            assert_eq!(result.recommendations.len(), result.top_risk_factors.len());
            assert_eq!(result.benchmarks.len(), result.top_risk_factors.len());

            for ((factor, item), bench) in result
                .top_risk_factors
                .iter()
                .zip(&result.action_items)
                .zip(&result.benchmarks)
            {
                assert_eq!(factor.feature, item.feature);
                assert_eq!(factor.feature, bench.feature);
                assert!((0.0..=100.0).contains(&bench.performance_level));
            }
            let texts: Vec<&String> = result.action_items.iter().map(|a| &a.text).collect();
            assert_eq!(texts, result.recommendations.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_idempotent_output() {
        let engine = engine();
        let vector = validate(&struggling_student()).unwrap();

        let first = serde_json::to_vec(&engine.assess_vector(&vector).unwrap()).unwrap();
        let second = serde_json::to_vec(&engine.assess_vector(&vector).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_occlusion_path_matches_native_direction() {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = OpaqueModel { inner: LinearRiskModel::builtin(), calls: Arc::clone(&calls) };
        let engine = engine_with(model);
        let result = engine.assess(&struggling_student()).unwrap();

        // One prediction, then one per feature that differs from its baseline
        let calls = calls.load(AtomicOrdering::SeqCst);
        assert!(calls > 1 && calls <= 1 + FEATURE_LAYOUT.len(), "calls = {}", calls);

        assert_eq!(result.risk_level, RiskLevel::AtRisk);
        let grade = result.top_risk_factors.iter().find(|f| f.feature == "avg_grade").unwrap();
        assert!(grade.impact.is_concern());
    }

    #[test]
    fn test_strengths_only_on_favorable_values() {
        let near_benchmarks = json!({
            "student_id": "s-near",
            "avg_grade": 68,
            "grade_consistency": 85,
            "grade_range": 30,
            "num_assessments": 6,
            "assessment_completion_rate": 0.75,
            "studied_credits": 120,
            "num_of_prev_attempts": 0,
            "low_performance": 0,
            "low_engagement": 0,
            "has_previous_attempts": 0
        });

        let engine = engine();
        let result = engine.assess(&near_benchmarks).unwrap();
        let impact = |name: &str| {
            result.top_risk_factors.iter().find(|f| f.feature == name).map(|f| f.impact)
        };
        assert!(impact("avg_grade").map_or(false, |t| t.is_concern()));
        assert!(impact("assessment_completion_rate").map_or(false, |t| t.is_concern()));
        assert_eq!(impact("studied_credits"), Some(ImpactTier::Strength));

        for raw in [near_benchmarks, struggling_student(), thriving_student(), medium_student()] {
            assert_tiers_agree_with_benchmarks(&engine, &raw);
        }
    }

    #[test]
    fn test_contradicting_attributions_are_neutralised() {
        let engine = engine_with(ContrarianModel(LinearRiskModel::builtin()));
        assert_tiers_agree_with_benchmarks(&engine, &struggling_student());

        let result = engine.assess(&struggling_student()).unwrap();
        let grade = result.top_risk_factors.iter().find(|f| f.feature == "avg_grade").unwrap();
        assert_eq!(grade.impact, ImpactTier::Neutral);
        assert!(result.action_items.iter().all(|a| !a.text.contains("meets the benchmark")));
    }

    #[test]
    fn test_shared_engine_across_threads() {
        let engine = Arc::new(engine());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let raw = if i % 2 == 0 { struggling_student() } else { thriving_student() };
                    engine.assess(&raw).map(|r| r.risk_level)
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let level = handle.join().unwrap().unwrap();
            let expected = if i % 2 == 0 { RiskLevel::AtRisk } else { RiskLevel::Safe };
            assert_eq!(level, expected);
        }
    }

    // ------------------------------------------------------------------
    // Deadlines
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_timeout_reports_inference_timeout() {
        let engine = Arc::new(engine_with(SlowModel {
            inner: LinearRiskModel::builtin(),
            delay: Duration::from_millis(500),
        }));

        let err = engine
            .assess_with_timeout(&medium_student(), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InferenceTimeout { stage: Stage::Inference, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_within_deadline_matches_sync_result() {
        let engine = Arc::new(engine());
        let raw = medium_student();

        let timed = engine.assess_with_timeout(&raw, Duration::from_secs(5)).await.unwrap();
        let direct = engine.assess(&raw).unwrap();
        assert_eq!(timed, direct);
    }

    #[tokio::test]
    async fn test_validation_precedes_inference() {
        let engine = Arc::new(engine_with(DownModel(LinearRiskModel::builtin().metadata().clone())));
        let mut raw = medium_student();
        raw["low_engagement"] = json!(3);

        let err = engine.assess_with_timeout(&raw, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
