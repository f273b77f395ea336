//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use saga::{ErrorKind, SagaError};

/// API-level error type that maps to HTTP responses.
///
/// The body is always `{"error": <message>, "kind": <KIND>}`.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request that never reached a service.
    BadRequest(String),
    /// Error returned by a service.
    Saga(SagaError),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::BadRequest(_) => ErrorKind::Validation,
            ApiError::Saga(err) => err.kind(),
        }
    }
}

/// HTTP status for each error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound | ErrorKind::UpstreamNotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation | ErrorKind::InsufficientStock => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidTransition => StatusCode::CONFLICT,
        ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Saga(err) => err.to_string(),
        };

        match kind {
            ErrorKind::Internal => tracing::error!(error = %message, "internal server error"),
            ErrorKind::UpstreamUnavailable => tracing::warn!(error = %message, "downstream unavailable"),
            _ => tracing::debug!(error = %message, %kind, "request rejected"),
        }
        metrics::counter!("api_errors_total", "kind" => kind.as_str()).increment(1);

        let body = serde_json::json!({ "error": message, "kind": kind });
        (status_for(kind), axum::Json(body)).into_response()
    }
}

impl From<SagaError> for ApiError {
    fn from(err: SagaError) -> Self {
        ApiError::Saga(err)
    }
}
