//! Per-route request timing.
//!
//! `track_requests` wraps every route and records elapsed time into a bucket
//! keyed by route template, method, and response status. Buckets live in a
//! `DashMap` and are served by `GET /stats`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use dashmap::DashMap;

use hashkey_types::stats::RouteStats;

use crate::state::AppState;

/// Bucket resource shared by every request that matched no route.
pub const UNMATCHED_RESOURCE: &str = "<unmatched>";

/// Concurrent aggregation of request timings.
///
/// Cloning produces a shared view of the same buckets.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    buckets: Arc<DashMap<String, RouteStats>>,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one finished request into its bucket.
    pub fn record(&self, resource: &str, method: &str, code: u16, elapsed: Duration) {
        let bucket = format!("{resource}{method}{code}");
        self.buckets
            .entry(bucket)
            .or_insert_with(|| RouteStats::new(resource, method, code))
            .record(elapsed.as_secs_f64() * 1_000.0);
    }

    /// Copy of every bucket, ordered by resource, method, then status.
    pub fn snapshot(&self) -> Vec<RouteStats> {
        let mut stats: Vec<RouteStats> = self.buckets.iter().map(|r| r.value().clone()).collect();
        stats.sort_by(|a, b| {
            (a.resource.as_str(), a.method.as_str(), a.code)
                .cmp(&(b.resource.as_str(), b.method.as_str(), b.code))
        });
        stats
    }
}

/// Middleware recording timing for every request.
///
/// Uses the matched route template (`/v3/hash/{key}`) so per-key paths share
/// one bucket. Requests that match no route all land in
/// [`UNMATCHED_RESOURCE`].
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let resource = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_RESOURCE.to_string(), |path| path.as_str().to_string());
    let start = Instant::now();

    let response = next.run(request).await;
    let elapsed = start.elapsed();
    let status = response.status();

    state
        .metrics
        .record(&resource, &method, status.as_u16(), elapsed);
    tracing::debug!(
        method = %method,
        resource = %resource,
        status = %status,
        duration_ms = %elapsed.as_millis(),
        "request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_groups_by_resource_method_and_code() {
        let metrics = RequestMetrics::new();
        metrics.record("/v2/hash", "POST", 200, Duration::from_millis(2));
        metrics.record("/v2/hash", "POST", 200, Duration::from_millis(4));
        metrics.record("/v2/hash", "GET", 400, Duration::from_millis(1));

        let stats = metrics.snapshot();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].method, "GET");
        assert_eq!(stats[0].code, 400);
        assert_eq!(stats[1].count, 2);
        assert!((stats[1].average - 3.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_is_sorted_by_resource() {
        let metrics = RequestMetrics::new();
        metrics.record("/v3/hash/{key}", "GET", 200, Duration::ZERO);
        metrics.record("/stats", "GET", 200, Duration::ZERO);
        metrics.record("/v1/hash", "POST", 200, Duration::ZERO);

        let resources: Vec<_> = metrics
            .snapshot()
            .into_iter()
            .map(|s| s.resource)
            .collect();
        assert_eq!(resources, vec!["/stats", "/v1/hash", "/v3/hash/{key}"]);
    }

    #[test]
    fn clone_shares_buckets() {
        let metrics = RequestMetrics::new();
        let view = metrics.clone();
        metrics.record("/health", "GET", 200, Duration::ZERO);
        assert_eq!(view.snapshot().len(), 1);
    }
}
