//! PayloadHasher trait for computing one-way digests.
//!
//! Defined in hashkey-core so the digest pipeline can hash payloads without
//! coupling to a specific algorithm. The `Sha512PayloadHasher` adapter lives
//! in hashkey-infra.

use hashkey_types::digest::EncodedDigest;

/// Abstraction over one-way payload hashing.
///
/// Implementations must be deterministic and unsalted: the same bytes always
/// produce the same encoded digest. Every byte sequence, including the empty
/// one, is valid input.
pub trait PayloadHasher: Send + Sync {
    /// Compute the text-encoded digest of `payload`.
    fn encode(&self, payload: &[u8]) -> EncodedDigest;
}
