//! Health check handler

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use edumind_risk_core::api::EngineStatus;

use crate::{AppState, EngineSlot, LOAD_FAILURE_REASON};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    engine: Option<EngineStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

/// 200 once the model is loaded, 503 while loading or after a failed load
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let slot = state.engine.read().clone();

    let (code, status, engine, reason) = match slot {
        EngineSlot::Ready(engine) => (
            StatusCode::OK,
            "healthy",
            Some(EngineStatus::collect(&engine)),
            None,
        ),
        EngineSlot::Loading => (StatusCode::SERVICE_UNAVAILABLE, "starting", None, None),
        EngineSlot::Failed => (
            StatusCode::SERVICE_UNAVAILABLE,
            "failed",
            None,
            Some(LOAD_FAILURE_REASON),
        ),
    };

    (
        code,
        Json(HealthResponse {
            status,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: chrono::Utc::now().timestamp(),
            engine,
            reason,
        }),
    )
}
