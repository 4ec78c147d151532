use serde::{Deserialize, Serialize};

/// Aggregated timing for one (resource, method, status code) bucket.
///
/// `average` is the mean handling time in milliseconds across `count`
/// requests. The running total is kept out of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStats {
    pub count: u64,
    pub average: f64,
    pub method: String,
    pub resource: String,
    pub code: u16,
    #[serde(skip)]
    pub total_ms: f64,
}

impl RouteStats {
    /// Empty bucket for a route/method/status triple.
    pub fn new(resource: impl Into<String>, method: impl Into<String>, code: u16) -> Self {
        Self {
            count: 0,
            average: 0.0,
            method: method.into(),
            resource: resource.into(),
            code,
            total_ms: 0.0,
        }
    }

    /// Fold one request's elapsed time into the bucket.
    pub fn record(&mut self, elapsed_ms: f64) {
        self.count += 1;
        self.total_ms += elapsed_ms;
        self.average = self.total_ms / self.count as f64;
    }
}
