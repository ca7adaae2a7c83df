//! API error handling
//!
//! The mapping preserves the caller-facing distinction between "your request
//! was invalid" (4xx, fix the input) and "the valuation service is
//! unavailable" (5xx, retry later) rather than collapsing everything into
//! one generic failure.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_lending::{LendingError, ValuationError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("upstream valuation failure: {0}")]
    UpstreamFailure(String),

    #[error("upstream valuation timeout: {0}")]
    UpstreamTimeout(String),

    #[error("internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone())
            }
            ApiError::UpstreamFailure(msg) => {
                (StatusCode::BAD_GATEWAY, "valuation_service_failure", msg.clone())
            }
            ApiError::UpstreamTimeout(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, "valuation_service_timeout", msg.clone())
            }
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LendingError> for ApiError {
    fn from(err: LendingError) -> Self {
        match &err {
            LendingError::NotFound(_) => ApiError::NotFound(err.to_string()),
            LendingError::InvalidState { .. } | LendingError::AlreadyValuated(_) => {
                ApiError::Conflict(err.to_string())
            }
            LendingError::Validation(_) => ApiError::Validation(err.to_string()),
            LendingError::ValuationService(inner) => {
                if inner.is_timeout() {
                    ApiError::UpstreamTimeout(err.to_string())
                } else {
                    ApiError::UpstreamFailure(err.to_string())
                }
            }
            // The calculator returned a value the engine refuses; an
            // upstream data problem, not a caller mistake
            LendingError::Ltv(_) => ApiError::UpstreamFailure(err.to_string()),
            LendingError::Store(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<ValuationError> for ApiError {
    fn from(err: ValuationError) -> Self {
        if err.is_timeout() {
            ApiError::UpstreamTimeout(err.to_string())
        } else {
            ApiError::UpstreamFailure(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::LoanId;
    use domain_lending::LoanStatus;

    #[test]
    fn test_not_found_maps_to_404() {
        let api: ApiError = LendingError::NotFound(LoanId::new()).into();
        assert!(matches!(api, ApiError::NotFound(_)));
    }

    #[test]
    fn test_guard_failures_map_to_conflict() {
        let api: ApiError =
            LendingError::invalid_state(LoanStatus::Approved, "valuation already completed").into();
        assert!(matches!(api, ApiError::Conflict(_)));

        let api: ApiError = LendingError::AlreadyValuated(LoanId::new()).into();
        assert!(matches!(api, ApiError::Conflict(_)));
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let api: ApiError =
            LendingError::ValuationService(ValuationError::Timeout { timeout_ms: 5_000 }).into();
        assert!(matches!(api, ApiError::UpstreamTimeout(_)));
    }

    #[test]
    fn test_remote_rejection_maps_to_bad_gateway() {
        let api: ApiError = LendingError::ValuationService(ValuationError::Rejected {
            status: 422,
            detail: "bad input".to_string(),
        })
        .into();
        assert!(matches!(api, ApiError::UpstreamFailure(_)));
    }
}
