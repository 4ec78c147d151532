//! SHA-512 payload hashing for the digest pipeline.
//!
//! Implements the `PayloadHasher` trait from `hashkey-core` using the `sha2`
//! crate (RustCrypto ecosystem), encoding the 64-byte digest as standard
//! padded base64.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha512};

use hashkey_core::service::hash::PayloadHasher;
use hashkey_types::digest::EncodedDigest;

/// SHA-512 implementation of `PayloadHasher`.
pub struct Sha512PayloadHasher;

impl Sha512PayloadHasher {
    /// Create a new hasher.
    pub fn new() -> Self {
        Self
    }
}

impl Default for Sha512PayloadHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadHasher for Sha512PayloadHasher {
    fn encode(&self, payload: &[u8]) -> EncodedDigest {
        let digest = Sha512::digest(payload);
        EncodedDigest::new(STANDARD.encode(digest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha512_known_value() {
        let hasher = Sha512PayloadHasher::new();
        let digest = hasher.encode(b"angryMonkey");
        assert_eq!(
            digest.as_str(),
            "ZEHhWB65gUlzdVwtDQArEyx+KVLzp/aTaRaPlBzYRIFj6vjFdqEb0Q5B8zVKCZ0vKbZPZklJz0Fd7su2A+gf7Q=="
        );
    }

    #[test]
    fn test_sha512_empty_payload() {
        let hasher = Sha512PayloadHasher::new();
        assert_eq!(
            hasher.encode(b"").as_str(),
            "z4PhNX7vuL3xVChQ1m2AB9Yg5AULVxXcg/SpIdNs6c5H0NE8XYXysP+DGNKHfuwvY7kxvUdBeoGlODJ6+SfaPg=="
        );
    }

    #[test]
    fn test_sha512_deterministic() {
        let hasher = Sha512PayloadHasher::new();
        let payload = [0u8, 159, 146, 150, 255];
        assert_eq!(hasher.encode(&payload), hasher.encode(&payload));
    }

    #[test]
    fn test_sha512_different_payloads() {
        let hasher = Sha512PayloadHasher::new();
        assert_ne!(hasher.encode(b"funkyMonkey"), hasher.encode(b"sadMonkey"));
    }

    #[test]
    fn test_sha512_is_standard_base64_of_64_bytes() {
        let hasher = Sha512PayloadHasher::new();
        let digest = hasher.encode(b"test");
        // 64 bytes -> 88 base64 chars with "==" padding
        assert_eq!(digest.as_str().len(), 88);
        assert!(digest.as_str().ends_with("=="));
        let decoded = STANDARD.decode(digest.as_str()).unwrap();
        assert_eq!(decoded.len(), 64);
    }
}
