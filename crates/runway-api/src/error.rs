use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use runway_core::ProvisionError;

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No runner identity could be generated.
    #[error("{0}")]
    Exhausted(String),

    /// A member name was already taken; the bundle was rolled back.
    #[error("{0}")]
    Collision(String),

    /// The control plane failed or refused a call; the bundle was rolled back.
    #[error("{0}")]
    ControlPlane(String),

    /// Rollback left resources behind.
    #[error("{0}")]
    Orphaned(String),

    /// The request ran past its deadline or was cancelled.
    #[error("{0}")]
    Deadline(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Exhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Collision(_) => StatusCode::CONFLICT,
            ApiError::ControlPlane(_) => StatusCode::BAD_GATEWAY,
            ApiError::Orphaned(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Deadline(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<ProvisionError> for ApiError {
    fn from(e: ProvisionError) -> Self {
        let msg = e.to_string();
        match e {
            ProvisionError::GenerationExhausted { .. } => ApiError::Exhausted(msg),
            ProvisionError::Orphaned { .. } => ApiError::Orphaned(msg),
            ProvisionError::InvalidPolicy(_) => ApiError::Internal(msg),
            _ if e.is_collision() => ApiError::Collision(msg),
            _ if e.is_deadline() => ApiError::Deadline(msg),
            _ => ApiError::ControlPlane(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(FailureResponse::new(self.to_string()))).into_response()
    }
}
