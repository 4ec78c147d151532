//! POST /shutdown - begin graceful shutdown.
//!
//! The response is sent before the listener stops; in-flight requests and
//! digest pipelines are allowed to finish.

use axum::extract::State;

use crate::state::AppState;

pub async fn request_shutdown(State(state): State<AppState>) -> &'static str {
    tracing::info!("shutdown requested over HTTP");
    state.shutdown.cancel();
    "Shutdown initialized"
}
