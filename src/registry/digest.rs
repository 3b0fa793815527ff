//! Content digest type
//!
//! A [`ContentDigest`] is the primary key of the registry: the uppercase
//! 32-hex-character MD5 of a blob's bytes. Identical bytes always produce
//! the same digest, so blob filenames derived from it deduplicate content
//! for free.

use md5::{Digest as _, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hex characters in a digest
pub const DIGEST_LEN: usize = 32;

/// Uppercase 32-hex-character content hash of a blob
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Compute the digest of a byte sequence
    pub fn compute(bytes: &[u8]) -> Self {
        Self(hex::encode_upper(Md5::digest(bytes)))
    }

    /// Parse a digest-shaped string: exactly 32 hex characters, any case.
    ///
    /// Returns `None` for anything else. Used on the query path, where a
    /// digest-shaped string is always self-resolving.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() == DIGEST_LEN && s.chars().all(|c| c.is_ascii_hexdigit()) {
            Some(Self(s.to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// Normalize a persisted or derived key without shape validation.
    ///
    /// The durable documents and inbound identifiers are uppercased but
    /// otherwise trusted as-is, matching the rebuild filter which checks
    /// shape, not content.
    pub fn from_stored(s: &str) -> Self {
        Self(s.trim().to_ascii_uppercase())
    }

    /// The digest as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_known_vectors() {
        // Standard MD5 test vectors, uppercased
        assert_eq!(
            ContentDigest::compute(b"").as_str(),
            "D41D8CD98F00B204E9800998ECF8427E"
        );
        assert_eq!(
            ContentDigest::compute(b"abc").as_str(),
            "900150983CD24FB0D6963F7D28E17F72"
        );
    }

    #[test]
    fn test_compute_deterministic() {
        let bytes = b"\x89PNG\r\n\x1a\n";
        assert_eq!(ContentDigest::compute(bytes), ContentDigest::compute(bytes));
    }

    #[test]
    fn test_parse_valid() {
        let digest = ContentDigest::parse("900150983cd24fb0d6963f7d28e17f72").unwrap();
        assert_eq!(digest.as_str(), "900150983CD24FB0D6963F7D28E17F72");

        // Whitespace is trimmed
        assert!(ContentDigest::parse("  900150983CD24FB0D6963F7D28E17F72  ").is_some());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(ContentDigest::parse("").is_none());
        assert!(ContentDigest::parse("grumpy-cat").is_none());
        // Too short
        assert!(ContentDigest::parse("900150983CD24FB0D6963F7D28E17F7").is_none());
        // Too long
        assert!(ContentDigest::parse("900150983CD24FB0D6963F7D28E17F722").is_none());
        // Non-hex character
        assert!(ContentDigest::parse("900150983CD24FB0D6963F7D28E17F7G").is_none());
    }

    #[test]
    fn test_from_stored_uppercases() {
        assert_eq!(
            ContentDigest::from_stored("abcdef").as_str(),
            "ABCDEF"
        );
    }

    #[test]
    fn test_serde_as_plain_string() {
        let digest = ContentDigest::compute(b"abc");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, "\"900150983CD24FB0D6963F7D28E17F72\"");
        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
    }
}
