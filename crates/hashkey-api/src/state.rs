//! Application state wiring the digest service and HTTP bookkeeping together.
//!
//! AppState holds the concrete service instance used by both CLI commands
//! and HTTP handlers. `DigestService` is generic over the hasher port;
//! AppState pins it to the SHA-512 adapter.

use std::path::Path;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use hashkey_core::service::digest::DigestService;
use hashkey_infra::config::load_global_config;
use hashkey_infra::crypto::hash::Sha512PayloadHasher;
use hashkey_types::config::GlobalConfig;

use crate::http::metrics::RequestMetrics;

/// Concrete service type pinned to the infra hasher.
pub type ConcreteDigestService = DigestService<Sha512PayloadHasher>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub digest_service: Arc<ConcreteDigestService>,
    pub metrics: RequestMetrics,
    /// Cancelled when a client asks the server to stop.
    pub shutdown: CancellationToken,
    pub config: Arc<GlobalConfig>,
}

impl AppState {
    /// Load configuration from `config_path` and wire services.
    pub async fn init(config_path: &Path) -> Self {
        let config = load_global_config(config_path).await;
        Self::from_config(config)
    }

    /// Wire services from an already-loaded configuration.
    pub fn from_config(config: GlobalConfig) -> Self {
        let digest_service = DigestService::new(&config.digest, Sha512PayloadHasher::new());
        tracing::debug!(
            key_space = config.digest.key_space,
            delay_ms = config.digest.processing_delay_ms,
            "digest service ready"
        );

        Self {
            digest_service: Arc::new(digest_service),
            metrics: RequestMetrics::new(),
            shutdown: CancellationToken::new(),
            config: Arc::new(config),
        }
    }
}
