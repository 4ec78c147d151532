//! HTTP API layer for hashkey.
//!
//! Axum-based plain-text API: `/v1/hash` digests inline, `/v2/hash` issues a
//! retrieval key, `/v3/hash/{key}` polls for the result. `/stats` reports
//! per-route timings and `/shutdown` stops the server.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
