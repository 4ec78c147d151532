//! Deferred digest pipeline.
//!
//! `DigestService` hands out a retrieval key as soon as a payload is
//! submitted and computes the digest on a separate task after the configured
//! processing delay. Until that task stores its result, lookups for the key
//! come back empty; callers are expected to poll.
//!
//! Pipelines run on a `TaskTracker` so shutdown can wait for in-flight work.
//! They are never cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;

use hashkey_types::config::DigestConfig;
use hashkey_types::digest::{DigestStatus, EncodedDigest, RetrievalKey};
use hashkey_types::error::AllocationError;

use crate::key::allocator::KeyAllocator;
use crate::service::hash::PayloadHasher;
use crate::store::result::ResultStore;

/// Compute-and-retrieve service, generic over the hashing algorithm.
pub struct DigestService<H: PayloadHasher> {
    allocator: KeyAllocator,
    store: ResultStore,
    hasher: Arc<H>,
    processing_delay: Duration,
    tracker: TaskTracker,
}

impl<H: PayloadHasher + 'static> DigestService<H> {
    /// Build a service from configuration.
    pub fn new(config: &DigestConfig, hasher: H) -> Self {
        Self::with_allocator(
            KeyAllocator::new(config.key_space, config.max_allocation_attempts),
            config.processing_delay(),
            hasher,
        )
    }

    /// Build a service around an existing allocator.
    pub fn with_allocator(allocator: KeyAllocator, processing_delay: Duration, hasher: H) -> Self {
        Self {
            allocator,
            store: ResultStore::new(),
            hasher: Arc::new(hasher),
            processing_delay,
            tracker: TaskTracker::new(),
        }
    }

    /// Digest `payload` immediately. No key is issued and nothing is stored.
    pub fn encode(&self, payload: &[u8]) -> EncodedDigest {
        self.hasher.encode(payload)
    }

    /// Digest `payload` after the processing delay, suspending only the
    /// calling task.
    pub async fn encode_delayed(&self, payload: &[u8]) -> EncodedDigest {
        tokio::time::sleep(self.processing_delay).await;
        self.hasher.encode(payload)
    }

    /// Issue a retrieval key for `payload` and schedule its digest.
    ///
    /// Returns as soon as the key is allocated. The digest becomes visible
    /// through [`lookup`](Self::lookup) once the processing delay has passed.
    /// Must be called from within a Tokio runtime.
    pub fn submit(&self, payload: Vec<u8>) -> Result<RetrievalKey, AllocationError> {
        let key = self.allocator.allocate()?;

        let task_key = key.clone();
        let store = self.store.clone();
        let hasher = Arc::clone(&self.hasher);
        let delay = self.processing_delay;

        self.tracker.spawn(async move {
            tokio::time::sleep(delay).await;
            let digest = hasher.encode(&payload);
            if store.put(task_key.clone(), digest) {
                tracing::debug!(key = %task_key, "digest stored");
            }
        });

        tracing::info!(key = %key, delay_ms = delay.as_millis() as u64, "digest scheduled");
        Ok(key)
    }

    /// The stored digest for `key`, or `None` when the key is unknown or its
    /// pipeline has not finished. The two cases look the same on purpose.
    pub fn lookup(&self, key: &RetrievalKey) -> Option<EncodedDigest> {
        self.store.get(key)
    }

    /// Distinguish unknown keys from pending ones.
    pub fn status(&self, key: &RetrievalKey) -> DigestStatus {
        if self.store.contains(key) {
            DigestStatus::Ready
        } else if self.allocator.is_allocated(key) {
            DigestStatus::Pending
        } else {
            DigestStatus::Unknown
        }
    }

    /// Pipelines scheduled but not yet finished.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Number of digests stored so far.
    pub fn completed(&self) -> usize {
        self.store.len()
    }

    pub fn processing_delay(&self) -> Duration {
        self.processing_delay
    }

    /// Wait up to `timeout` for every in-flight pipeline to finish.
    ///
    /// Returns `false` if the timeout elapsed first. New submissions are still
    /// accepted afterwards; they just won't be waited on by this call.
    pub async fn drain(&self, timeout: Duration) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(timeout, self.tracker.wait())
            .await
            .is_ok();
        if drained {
            tracing::info!(completed = self.store.len(), "digest pipelines drained");
        } else {
            tracing::warn!(
                in_flight = self.tracker.len(),
                timeout_ms = timeout.as_millis() as u64,
                "timed out waiting for digest pipelines"
            );
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use std::time::Instant;

    /// Stand-in hasher so these tests do not depend on a crypto crate.
    struct UppercaseHasher;

    impl PayloadHasher for UppercaseHasher {
        fn encode(&self, payload: &[u8]) -> EncodedDigest {
            EncodedDigest::new(format!(
                "h:{}",
                String::from_utf8_lossy(payload).to_uppercase()
            ))
        }
    }

    fn service(key_space: u32, delay_ms: u64) -> DigestService<UppercaseHasher> {
        DigestService::with_allocator(
            KeyAllocator::with_rng(key_space, 8, StdRng::seed_from_u64(1)),
            Duration::from_millis(delay_ms),
            UppercaseHasher,
        )
    }

    #[test]
    fn encode_is_deterministic() {
        let svc = service(10, 0);
        assert_eq!(svc.encode(b"angryMonkey"), svc.encode(b"angryMonkey"));
        assert_eq!(svc.encode(b"abc").as_str(), "h:ABC");
        assert_eq!(svc.encode(b"").as_str(), "h:");
    }

    #[tokio::test]
    async fn encode_delayed_waits_for_processing_delay() {
        let svc = service(10, 30);
        let start = Instant::now();
        let digest = svc.encode_delayed(b"abc").await;
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(digest, svc.encode(b"abc"));
        assert_eq!(svc.completed(), 0);
    }

    #[tokio::test]
    async fn key_is_visible_before_digest() {
        let svc = service(10_000, 200);
        let key = svc.submit(b"angryMonkey".to_vec()).unwrap();

        assert_eq!(svc.lookup(&key), None);
        assert_eq!(svc.status(&key), DigestStatus::Pending);
        assert_eq!(svc.in_flight(), 1);
    }

    #[tokio::test]
    async fn digest_matches_encode_after_delay() {
        let svc = service(10_000, 20);
        let key = svc.submit(b"angryMonkey".to_vec()).unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;

        assert_eq!(svc.lookup(&key), Some(svc.encode(b"angryMonkey")));
        assert_eq!(svc.status(&key), DigestStatus::Ready);
        assert_eq!(svc.in_flight(), 0);
    }

    #[tokio::test]
    async fn unknown_key_reads_like_pending() {
        let svc = service(10_000, 200);
        let pending = svc.submit(b"x".to_vec()).unwrap();
        let unknown = RetrievalKey::from("never-issued");

        assert_eq!(svc.lookup(&unknown), None);
        assert_eq!(svc.lookup(&unknown), svc.lookup(&pending));
        assert_eq!(svc.status(&unknown), DigestStatus::Unknown);
    }

    #[tokio::test]
    async fn stored_digest_never_changes() {
        let svc = service(10_000, 10);
        let key = svc.submit(b"stable".to_vec()).unwrap();
        assert!(svc.drain(Duration::from_secs(2)).await);

        let first = svc.lookup(&key).unwrap();
        for _ in 0..10 {
            assert_eq!(svc.lookup(&key), Some(first.clone()));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_submits_get_distinct_keys() {
        let svc = Arc::new(service(10_000, 50));
        let inputs = [
            "angryMonkey",
            "funkyMonkey",
            "sadMonkey",
            "happyMonkey",
            "justMonkey",
        ];

        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let svc = Arc::clone(&svc);
                let payload = input.as_bytes().to_vec();
                tokio::spawn(async move {
                    let key = svc.submit(payload).unwrap();
                    assert_eq!(svc.lookup(&key), None);
                    key
                })
            })
            .collect();

        let mut keys = Vec::new();
        for handle in handles {
            keys.push(handle.await.unwrap());
        }
        let unique: HashSet<_> = keys.iter().cloned().collect();
        assert_eq!(unique.len(), inputs.len());

        assert!(svc.drain(Duration::from_secs(2)).await);
        for (key, input) in keys.iter().zip(inputs) {
            assert_eq!(svc.lookup(key), Some(svc.encode(input.as_bytes())));
        }
    }

    #[tokio::test]
    async fn submit_reports_exhausted_key_space() {
        let svc = service(2, 0);
        svc.submit(b"a".to_vec()).unwrap();
        svc.submit(b"b".to_vec()).unwrap();

        let err = svc.submit(b"c".to_vec()).unwrap_err();
        assert_eq!(err, AllocationError::KeySpaceExhausted { key_space: 2 });
    }

    #[tokio::test]
    async fn drain_times_out_on_slow_pipelines() {
        let svc = service(10, 500);
        svc.submit(b"slow".to_vec()).unwrap();
        assert!(!svc.drain(Duration::from_millis(20)).await);
        assert_eq!(svc.in_flight(), 1);
    }

    #[tokio::test]
    async fn new_reads_delay_and_space_from_config() {
        let config = DigestConfig {
            key_space: 3,
            processing_delay_ms: 15,
            max_allocation_attempts: 2,
        };
        let svc = DigestService::new(&config, UppercaseHasher);
        assert_eq!(svc.processing_delay(), Duration::from_millis(15));

        for _ in 0..3 {
            svc.submit(Vec::new()).unwrap();
        }
        assert!(svc.submit(Vec::new()).is_err());
    }
}
