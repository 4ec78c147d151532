//! GET /stats - per-route request counts and average latency.

use axum::extract::State;
use axum::Json;

use hashkey_types::stats::RouteStats;

use crate::state::AppState;

pub async fn get_stats(State(state): State<AppState>) -> Json<Vec<RouteStats>> {
    Json(state.metrics.snapshot())
}
