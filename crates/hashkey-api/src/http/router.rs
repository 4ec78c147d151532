//! Axum router configuration with middleware.
//!
//! Middleware: request timing (feeds `/stats`), CORS, tracing.
//! Known paths answer other methods with 400; unknown paths with 404.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::http::metrics::track_requests;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/v1/hash",
            post(handlers::hash::hash_now).fallback(handlers::bad_method),
        )
        .route(
            "/v2/hash",
            post(handlers::hash::submit_hash).fallback(handlers::bad_method),
        )
        .route(
            "/v3/hash/",
            get(handlers::hash::get_hash_without_key).fallback(handlers::bad_method),
        )
        .route(
            "/v3/hash/{key}",
            get(handlers::hash::get_hash).fallback(handlers::bad_method),
        )
        .route(
            "/v3/hash/{key}/status",
            get(handlers::hash::get_hash_status).fallback(handlers::bad_method),
        )
        .route(
            "/stats",
            get(handlers::stats::get_stats).fallback(handlers::bad_method),
        )
        .route(
            "/shutdown",
            post(handlers::shutdown::request_shutdown).fallback(handlers::bad_method),
        )
        .route("/health", get(health_check))
        .fallback(handlers::not_found)
        .layer(from_fn_with_state(state.clone(), track_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
