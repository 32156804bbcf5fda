//! Root-key signers for issuers
//!
//! A [`Signer`] holds (or has access to) a root private key and vouches for
//! an issuer's leaf key. The core never sees root private key material; it
//! only asks for a signature and the URL where the matching public key is
//! published.

use crate::error::Result;
use std::sync::Arc;
use tssig_crypto::KeyPair;
use tssig_types::{DerPublicKey, SignatureBytes};

/// Signs issuer attestations with a root key
pub trait Signer: Send + Sync {
    /// URL where the DER-encoded root public key can be fetched
    fn key_url(&self) -> Result<String>;

    /// Sign `message` with the root private key
    fn sign(&self, message: &[u8]) -> Result<SignatureBytes>;
}

impl<T: Signer + ?Sized> Signer for Arc<T> {
    fn key_url(&self) -> Result<String> {
        (**self).key_url()
    }

    fn sign(&self, message: &[u8]) -> Result<SignatureBytes> {
        (**self).sign(message)
    }
}

impl<T: Signer + ?Sized> Signer for Box<T> {
    fn key_url(&self) -> Result<String> {
        (**self).key_url()
    }

    fn sign(&self, message: &[u8]) -> Result<SignatureBytes> {
        (**self).sign(message)
    }
}

/// Signs with a root key pair held in process memory
///
/// Supports ECDSA P-256, P-384 and P-521 (hashed with SHA-256, SHA-384 and
/// SHA-512 respectively) and Ed25519.
#[derive(Debug)]
pub struct LocalKeySigner {
    key_url: String,
    key_pair: KeyPair,
}

impl LocalKeySigner {
    /// Create a signer for `key_pair`, whose public key is served at `key_url`
    pub fn new(key_url: impl Into<String>, key_pair: KeyPair) -> Self {
        Self {
            key_url: key_url.into(),
            key_pair,
        }
    }

    /// The DER-encoded public key to publish at the key URL
    pub fn public_key_der(&self) -> Result<DerPublicKey> {
        Ok(self.key_pair.public_key_to_der()?)
    }
}

impl Signer for LocalKeySigner {
    fn key_url(&self) -> Result<String> {
        Ok(self.key_url.clone())
    }

    fn sign(&self, message: &[u8]) -> Result<SignatureBytes> {
        Ok(self.key_pair.sign(message)?)
    }
}
