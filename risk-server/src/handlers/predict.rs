//! Prediction handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderName, HeaderValue},
    Json,
};
use serde_json::Value;
use uuid::Uuid;

use edumind_risk_core::RiskAssessment;

use crate::{AppResult, AppState};

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Assess one student record
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> AppResult<([(HeaderName, HeaderValue); 1], Json<RiskAssessment>)> {
    let request_id = Uuid::new_v4();
    let Json(record) = payload?;

    let engine = state.ready_engine()?;
    let assessment = engine
        .assess_with_timeout(&record, state.config.inference_timeout)
        .await
        .map_err(|e| {
            tracing::info!(%request_id, kind = e.kind(), "Assessment rejected: {}", e);
            e
        })?;

    tracing::info!(
        %request_id,
        student_id = %assessment.student_id,
        risk_level = %assessment.risk_level.as_str(),
        "Assessment completed (score {:.3})",
        assessment.risk_score
    );

    // Uuid text is always a valid header value
    let header_value = HeaderValue::from_str(&request_id.to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("unknown"));

    Ok(([(REQUEST_ID_HEADER.clone(), header_value)], Json(assessment)))
}
