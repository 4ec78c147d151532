//! HTTP request handlers.

pub mod hash;
pub mod shutdown;
pub mod stats;

use axum::http::Method;

use crate::http::error::AppError;

/// Method fallback for known routes: respond 400 rather than 405.
pub async fn bad_method(method: Method) -> AppError {
    AppError::BadMethod(method.to_string())
}

/// Fallback for paths with no route.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
