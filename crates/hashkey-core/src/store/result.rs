//! Concurrent key → digest store backed by `DashMap`.
//!
//! Entries are written once by the pipeline that owns the key and never
//! change afterwards. Reads clone the digest so no `DashMap` guard outlives
//! the call.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use hashkey_types::digest::{EncodedDigest, RetrievalKey};

/// Write-once store of completed digests.
///
/// Cloning produces a shared view of the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    inner: Arc<DashMap<RetrievalKey, EncodedDigest>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored digest for `key`, or `None` if nothing has been stored yet.
    pub fn get(&self, key: &RetrievalKey) -> Option<EncodedDigest> {
        self.inner.get(key).map(|r| r.value().clone())
    }

    /// Store the digest for `key` if the key has no entry yet.
    ///
    /// Returns `false` and leaves the existing digest in place when the key
    /// was already written.
    pub fn put(&self, key: RetrievalKey, digest: EncodedDigest) -> bool {
        match self.inner.entry(key) {
            Entry::Occupied(entry) => {
                tracing::warn!(key = %entry.key(), "ignoring second write for retrieval key");
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(digest);
                true
            }
        }
    }

    pub fn contains(&self, key: &RetrievalKey) -> bool {
        self.inner.contains_key(key)
    }

    /// Number of completed digests.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
