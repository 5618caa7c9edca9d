//! Error handling

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use edumind_risk_core::{EngineError, ValidationError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Request errors
    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(ValidationError),

    // Engine lifecycle
    #[error("model is not ready: {0}")]
    NotReady(String),

    // Inference errors
    #[error("{message}")]
    InferenceUnavailable { stage: &'static str, message: String },

    #[error("{message}")]
    InferenceTimeout { stage: &'static str, message: String },

    #[error("{message}")]
    ContractViolation { stage: &'static str, message: String },
}

impl AppError {
    fn kind(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "bad_request",
            AppError::Validation(_) => "validation_error",
            AppError::NotReady(_) => "not_ready",
            AppError::InferenceUnavailable { .. } => "inference_unavailable",
            AppError::InferenceTimeout { .. } => "inference_timeout",
            AppError::ContractViolation { .. } => "inference_contract_violation",
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        let message = err.to_string();
        let stage = err.stage().as_str();
        match err {
            EngineError::Validation(e) => AppError::Validation(e),
            EngineError::InferenceUnavailable { .. } => AppError::InferenceUnavailable { stage, message },
            EngineError::InferenceTimeout { .. } => AppError::InferenceTimeout { stage, message },
            EngineError::InferenceContractViolation { .. } => {
                AppError::ContractViolation { stage, message }
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let (status, body) = match &self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg }),
            ),
            AppError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "error": e.to_string(),
                    "field": e.field,
                    "constraint": e.constraint,
                }),
            ),
            AppError::NotReady(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": format!("Model is not ready: {}", msg) }),
            ),
            AppError::InferenceUnavailable { stage, message } => {
                tracing::warn!("Inference unavailable: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "Prediction model is temporarily unavailable", "stage": stage }),
                )
            }
            AppError::InferenceTimeout { stage, message } => {
                tracing::warn!("Inference timeout: {}", message);
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    json!({ "error": "Prediction model did not answer in time", "stage": stage }),
                )
            }
            AppError::ContractViolation { stage, message } => {
                tracing::error!("Model contract violation: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Prediction model returned an invalid result", "stage": stage }),
                )
            }
        };

        let mut body = body;
        body["kind"] = json!(kind);
        body["status"] = json!(status.as_u16());

        let retryable = matches!(
            self,
            AppError::NotReady(_)
                | AppError::InferenceUnavailable { .. }
                | AppError::InferenceTimeout { .. }
        );

        let mut response = (status, Json(body)).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, header::HeaderValue::from_static("1"));
        }
        response
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
