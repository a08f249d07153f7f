//! API error types and helpers.
//!
//! # Purpose and responsibility
//! Centralizes HTTP error response construction to keep error shapes uniform
//! across agency endpoints.
//!
//! # Key invariants and assumptions
//! - Error responses must include a stable `code` and human-readable `message`.
//! - Status codes must align with the error category.
//!
//! # Security considerations
//! - Access denials carry generic messages only; which permission was missing
//!   is logged server-side by the gate and never echoed here.
//! - Store failures log details server-side and return generic messages.
use crate::api::types::ErrorResponse;
use crate::auth::AccessError;
use crate::store::StoreError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;

/// Structured API error returned by handlers.
///
/// # Invariants
/// - `status` must match the semantics of `body.code`.
///
/// # Example
/// ```rust
/// use axum::http::StatusCode;
/// use agency::api::error::ApiError;
/// use agency::api::types::ErrorResponse;
///
/// let err = ApiError {
///     status: StatusCode::FORBIDDEN,
///     body: ErrorResponse {
///         code: "forbidden".to_string(),
///         message: "Forbidden".to_string(),
///         request_id: None,
///     },
/// };
/// ```
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

fn api_error(status: StatusCode, code: &str, message: &str) -> ApiError {
    ApiError {
        status,
        body: ErrorResponse {
            code: code.to_string(),
            message: message.to_string(),
            request_id: None,
        },
    }
}

/// Build a 401 Unauthorized error.
pub fn api_unauthorized(message: &str) -> ApiError {
    api_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// Build a 403 Forbidden error.
pub fn api_forbidden(message: &str) -> ApiError {
    api_error(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Build a 400 Bad Request validation error.
pub fn api_validation_error(message: &str) -> ApiError {
    api_error(StatusCode::BAD_REQUEST, "validation_error", message)
}

/// Build a 503 Service Unavailable error for a failed or slow dependency.
pub fn api_unavailable(message: &str) -> ApiError {
    api_error(StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
}

/// Build a 503 from a failed store lookup.
///
/// # What it does
/// Logs the store error and returns the same generic body as any other
/// unavailable dependency.
pub fn api_store_unavailable(err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "agency storage error");
    api_unavailable("Service unavailable")
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated(_) => api_unauthorized("Unauthorized"),
            AccessError::Forbidden(_) => api_forbidden("Forbidden"),
            AccessError::StoreUnavailable(detail) => {
                tracing::error!(error = %detail, "access check could not reach store");
                api_unavailable("Service unavailable")
            }
        }
    }
}
