//! Observability setup for hashkey: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
