//! Hash algorithm types and caller digests

use crate::encoding::Base64Url;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// SHA2-224
    Sha2224,
    /// SHA2-256
    Sha2256,
    /// SHA2-384
    Sha2384,
    /// SHA2-512
    Sha2512,
}

impl HashAlgorithm {
    /// Get the digest size in bytes for this algorithm
    pub fn digest_size(&self) -> usize {
        match self {
            HashAlgorithm::Sha2224 => 28,
            HashAlgorithm::Sha2256 => 32,
            HashAlgorithm::Sha2384 => 48,
            HashAlgorithm::Sha2512 => 64,
        }
    }

    /// Find the algorithm whose output has exactly `len` bytes
    pub fn from_digest_size(len: usize) -> Option<Self> {
        match len {
            28 => Some(HashAlgorithm::Sha2224),
            32 => Some(HashAlgorithm::Sha2256),
            48 => Some(HashAlgorithm::Sha2384),
            64 => Some(HashAlgorithm::Sha2512),
            _ => None,
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HashAlgorithm::Sha2224 => write!(f, "SHA2_224"),
            HashAlgorithm::Sha2256 => write!(f, "SHA2_256"),
            HashAlgorithm::Sha2384 => write!(f, "SHA2_384"),
            HashAlgorithm::Sha2512 => write!(f, "SHA2_512"),
        }
    }
}

/// A caller-supplied digest
///
/// The bytes are opaque, but the length must match one of the SHA-2 output
/// sizes (28, 32, 48 or 64 bytes). A `Digest` with any other length cannot
/// be constructed, including through deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Create a digest, validating its length
    pub fn new(bytes: Vec<u8>) -> Result<Self> {
        if HashAlgorithm::from_digest_size(bytes.len()).is_none() {
            return Err(Error::InvalidDigestLength(bytes.len()));
        }
        Ok(Digest(bytes))
    }

    /// Parse from a base64url-encoded (unpadded) string
    pub fn from_base64url(s: &str) -> Result<Self> {
        Self::new(Base64Url::new(s).decode()?)
    }

    /// Encode as base64url string
    pub fn to_base64url(&self) -> Base64Url {
        Base64Url::encode(&self.0)
    }

    /// The hash algorithm implied by the digest length
    pub fn algorithm(&self) -> HashAlgorithm {
        match self.0.len() {
            28 => HashAlgorithm::Sha2224,
            32 => HashAlgorithm::Sha2256,
            48 => HashAlgorithm::Sha2384,
            _ => HashAlgorithm::Sha2512,
        }
    }

    /// Get the digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Get the length of the digest in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::new(bytes.to_vec())
    }
}

impl TryFrom<Vec<u8>> for Digest {
    type Error = Error;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::new(bytes)
    }
}

impl From<[u8; 28]> for Digest {
    fn from(bytes: [u8; 28]) -> Self {
        Digest(bytes.to_vec())
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Digest(bytes.to_vec())
    }
}

impl From<[u8; 48]> for Digest {
    fn from(bytes: [u8; 48]) -> Self {
        Digest(bytes.to_vec())
    }
}

impl From<[u8; 64]> for Digest {
    fn from(bytes: [u8; 64]) -> Self {
        Digest(bytes.to_vec())
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        crate::base64url_bytes::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = crate::base64url_bytes::deserialize(deserializer)?;
        Digest::new(bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_accepts_sha2_sizes() {
        for len in [28, 32, 48, 64] {
            let digest = Digest::new(vec![7u8; len]).unwrap();
            assert_eq!(digest.algorithm().digest_size(), len);
        }
    }

    #[test]
    fn test_digest_rejects_near_miss_sizes() {
        for len in [0, 27, 29, 33, 47, 49, 63, 65] {
            match Digest::new(vec![0u8; len]) {
                Err(Error::InvalidDigestLength(n)) => assert_eq!(n, len),
                other => panic!("length {} should be rejected, got {:?}", len, other),
            }
        }
    }

    #[test]
    fn test_digest_from_base64url() {
        let digest = Digest::from_base64url("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA").unwrap();
        assert_eq!(digest.as_bytes(), &[0u8; 32]);
        assert_eq!(digest.algorithm(), HashAlgorithm::Sha2256);
    }

    #[test]
    fn test_digest_error_message_reports_bits() {
        let err = Digest::new(vec![0u8; 20]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "digest must be exactly 224, 256, 384, or 512 bits, 160 bits found"
        );
    }

    #[test]
    fn test_digest_deserialize_validates_length() {
        // 27 bytes
        let json = format!("\"{}\"", Base64Url::encode(&[1u8; 27]));
        let result: std::result::Result<Digest, _> = serde_json::from_str(&json);
        assert!(result.is_err());

        let json = format!("\"{}\"", Base64Url::encode(&[1u8; 48]));
        let digest: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(digest.algorithm(), HashAlgorithm::Sha2384);
    }
}
