use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bourse_core::MarginAssessment;
use bourse_settlement::EngineError;
use thiserror::Error;

use super::dto::{ErrorResponse, MarginAssessmentResponse};

/// API error type
#[derive(Error, Debug)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub status: StatusCode,
    pub assessment: Option<MarginAssessment>,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        ApiError {
            code: code.to_string(),
            message: message.into(),
            status,
            assessment: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }

    pub fn missing_parameter(param: &str) -> Self {
        Self::bad_request(format!("mandatory parameter '{}' was not sent", param))
    }

    pub fn invalid_parameter(param: &str, reason: &str) -> Self {
        Self::bad_request(format!("illegal parameter '{}': {}", param, reason))
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        let code = err.kind();
        let status = match code {
            "VALIDATION" => StatusCode::BAD_REQUEST,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "INSUFFICIENT_MARGIN" | "INSUFFICIENT_FUNDS" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %err, "request failed");
        }
        ApiError {
            code: code.to_string(),
            message: err.to_string(),
            status,
            assessment: err.assessment().cloned(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            code: self.code,
            message: self.message,
            assessment: self.assessment.as_ref().map(MarginAssessmentResponse::from),
        });
        (self.status, body).into_response()
    }
}
