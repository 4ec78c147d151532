//! Business logic for hashkey.
//!
//! This crate owns the compute-and-retrieve pipeline: the key allocator, the
//! result store, and the `DigestService` that ties them together. Hashing is
//! reached through the `PayloadHasher` port; the concrete algorithm lives in
//! `hashkey-infra`. Nothing here knows about HTTP or crypto crates.

pub mod key;
pub mod service;
pub mod store;
