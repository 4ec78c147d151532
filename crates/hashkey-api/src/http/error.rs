//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use hashkey_types::error::AllocationError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Key allocation failed.
    Allocation(AllocationError),
    /// The route exists but not for this method.
    BadMethod(String),
    /// No route matched.
    NotFound,
}

impl From<AllocationError> for AppError {
    fn from(e: AllocationError) -> Self {
        AppError::Allocation(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Allocation(e @ AllocationError::KeySpaceExhausted { .. }) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "KEY_SPACE_EXHAUSTED",
                e.to_string(),
            ),
            AppError::BadMethod(method) => (
                StatusCode::BAD_REQUEST,
                "BAD_METHOD",
                format!("method {method} is not supported on this route"),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "no such route".to_string(),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = json!({
            "meta": {
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
