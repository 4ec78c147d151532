//! Configuration types for hashkey.
//!
//! `GlobalConfig` represents the top-level `hashkey.toml` with a `[digest]`
//! table for the compute-and-retrieve pipeline and a `[server]` table for the
//! HTTP listener. Every field has a default, so an empty file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub digest: DigestConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

/// Tuning for key allocation and deferred hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Number of distinct retrieval keys (`0..key_space`).
    #[serde(default = "default_key_space")]
    pub key_space: u32,

    /// Artificial processing delay before a submitted digest is stored.
    #[serde(default = "default_processing_delay_ms")]
    pub processing_delay_ms: u64,

    /// Random draws attempted before falling back to a linear scan.
    #[serde(default = "default_max_allocation_attempts")]
    pub max_allocation_attempts: u32,
}

fn default_key_space() -> u32 {
    10_000
}

fn default_processing_delay_ms() -> u64 {
    5_000
}

fn default_max_allocation_attempts() -> u32 {
    64
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            key_space: default_key_space(),
            processing_delay_ms: default_processing_delay_ms(),
            max_allocation_attempts: default_max_allocation_attempts(),
        }
    }
}

impl DigestConfig {
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.processing_delay_ms)
    }

    /// Reject values the allocator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_space == 0 {
            return Err(ConfigError::Invalid {
                field: "digest.key_space",
                message: "must be greater than zero".to_string(),
            });
        }
        if self.max_allocation_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "digest.max_allocation_attempts",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// How long shutdown waits for in-flight pipelines.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
        }
    }
}

impl ServerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
