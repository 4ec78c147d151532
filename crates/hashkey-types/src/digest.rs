use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Opaque handle returned on submission and used later to fetch a digest.
///
/// Keys are drawn from a bounded integer space but callers only ever see the
/// decimal string form. Two keys are equal when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetrievalKey(String);

impl RetrievalKey {
    /// Build the key for a slot in the allocator's key space.
    pub fn from_slot(slot: u32) -> Self {
        Self(slot.to_string())
    }

    /// The key as it is handed to callers.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key-space slot this key was allocated from, if it is a valid
    /// decimal slot number.
    pub fn slot(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl fmt::Display for RetrievalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RetrievalKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RetrievalKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for RetrievalKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

/// A one-way digest of a payload in its canonical text form
/// (standard, padded base64).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedDigest(String);

impl EncodedDigest {
    /// Wrap already-encoded digest text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EncodedDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a retrieval key stands in its lifecycle.
///
/// - Unknown: never issued by this process
/// - Pending: issued, digest not stored yet
/// - Ready: digest stored, will never change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestStatus {
    Unknown,
    Pending,
    Ready,
}

impl fmt::Display for DigestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestStatus::Unknown => write!(f, "unknown"),
            DigestStatus::Pending => write!(f, "pending"),
            DigestStatus::Ready => write!(f, "ready"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_slot_is_decimal() {
        let key = RetrievalKey::from_slot(42);
        assert_eq!(key.as_str(), "42");
        assert_eq!(key.slot(), Some(42));
    }

    #[test]
    fn test_key_with_non_numeric_text_has_no_slot() {
        let key: RetrievalKey = "abc".parse().unwrap();
        assert_eq!(key.slot(), None);
        assert_eq!(key.to_string(), "abc");
    }

    #[test]
    fn test_key_serializes_as_plain_string() {
        let key = RetrievalKey::from_slot(7);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"7\"");
    }

    #[test]
    fn test_digest_status_serializes_lowercase() {
        let json = serde_json::to_string(&DigestStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        assert_eq!(DigestStatus::Ready.to_string(), "ready");
    }
}
