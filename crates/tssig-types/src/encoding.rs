//! Type-safe encoding wrappers
//!
//! Every binary field on the wire is base64url text without padding
//! (RFC 4648 §5). Padded input is rejected rather than tolerated so that a
//! document has exactly one valid encoding.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Base64url-encoded data (unpadded)
///
/// It provides safe conversion to/from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Base64Url(String);

impl Base64Url {
    /// Create a new Base64Url wrapper from a string
    ///
    /// Note: This does not validate the encoding.
    /// Use `decode()` to validate and extract bytes.
    pub fn new(s: impl Into<String>) -> Self {
        Base64Url(s.into())
    }

    /// Create a Base64Url wrapper from raw bytes
    pub fn encode(bytes: &[u8]) -> Self {
        Base64Url(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Decode the base64url string to bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        URL_SAFE_NO_PAD
            .decode(&self.0)
            .map_err(|e| Error::InvalidEncoding(format!("invalid base64url: {}", e)))
    }

    /// Get the underlying string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert into the underlying String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Base64Url {
    fn from(s: String) -> Self {
        Base64Url(s)
    }
}

impl AsRef<str> for Base64Url {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Base64Url {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serde helper for base64url encoding/decoding of byte arrays
pub mod base64url_bytes {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        URL_SAFE_NO_PAD.decode(s).map_err(serde::de::Error::custom)
    }
}

/// A DER-encoded SubjectPublicKeyInfo
///
/// Serializes as base64url text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerPublicKey(#[serde(with = "crate::base64url_bytes")] Vec<u8>);

impl DerPublicKey {
    /// Create from DER bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the underlying DER bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Convert to owned DER bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Check if no key has been set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for DerPublicKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for DerPublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Raw signature bytes
///
/// For ECDSA this is a DER `SEQUENCE { r, s }`, for Ed25519 the fixed
/// 64-byte signature. Serializes as base64url text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBytes(#[serde(with = "crate::base64url_bytes")] Vec<u8>);

impl SignatureBytes {
    /// Create a new signature from raw bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Get the raw signature bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the inner bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Get the length of the signature in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the signature is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode the signature as base64url
    pub fn to_base64url(&self) -> Base64Url {
        Base64Url::encode(&self.0)
    }
}

impl From<Vec<u8>> for SignatureBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for SignatureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
