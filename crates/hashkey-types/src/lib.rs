//! Shared domain types for hashkey.
//!
//! Retrieval keys, encoded digests, per-route request statistics, the
//! configuration model, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod digest;
pub mod error;
pub mod stats;
