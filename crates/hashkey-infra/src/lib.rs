//! Infrastructure implementations for hashkey.
//!
//! Adapters for the ports defined in `hashkey-core`: the SHA-512 payload
//! hasher and the TOML configuration loader.

pub mod config;
pub mod crypto;
