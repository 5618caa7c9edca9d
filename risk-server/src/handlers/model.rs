//! Model information handler

use axum::{extract::State, Json};

use edumind_risk_core::api::ModelInfo;

use crate::{AppResult, AppState};

/// Describe the loaded model and its feature layout
pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let engine = state.ready_engine()?;
    Ok(Json(ModelInfo::collect(&engine)))
}
