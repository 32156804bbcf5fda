//! Key generation and signing using aws-lc-rs

use crate::error::{Error, Result};
use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        EcdsaKeyPair, EcdsaSigningAlgorithm, Ed25519KeyPair, KeyPair as AwsKeyPair,
        ECDSA_P256_SHA256_ASN1_SIGNING, ECDSA_P384_SHA384_ASN1_SIGNING,
        ECDSA_P521_SHA512_ASN1_SIGNING,
    },
};
use tssig_types::{DerPublicKey, SignatureBytes};

/// Supported signing schemes
///
/// ECDSA schemes pair each curve with the hash of matching strength; ECDSA
/// signatures are DER `SEQUENCE { r, s }`. Ed25519 signs the message
/// directly with no pre-hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningScheme {
    /// ECDSA P-256 with SHA-256
    EcdsaP256Sha256,
    /// ECDSA P-384 with SHA-384
    EcdsaP384Sha384,
    /// ECDSA P-521 with SHA-512
    EcdsaP521Sha512,
    /// Ed25519
    Ed25519,
}

impl SigningScheme {
    /// Select the ECDSA scheme for a curve of the given bit size
    pub fn for_ecdsa_bits(bits: usize) -> Result<Self> {
        match bits {
            256 => Ok(SigningScheme::EcdsaP256Sha256),
            384 => Ok(SigningScheme::EcdsaP384Sha384),
            521 => Ok(SigningScheme::EcdsaP521Sha512),
            other => Err(Error::UnsupportedKeySize(other)),
        }
    }

    /// Get the name of this scheme
    pub fn name(&self) -> &'static str {
        match self {
            SigningScheme::EcdsaP256Sha256 => "ECDSA_P256_SHA256",
            SigningScheme::EcdsaP384Sha384 => "ECDSA_P384_SHA384",
            SigningScheme::EcdsaP521Sha512 => "ECDSA_P521_SHA512",
            SigningScheme::Ed25519 => "ED25519",
        }
    }

    fn ecdsa_signing_algorithm(&self) -> Option<&'static EcdsaSigningAlgorithm> {
        match self {
            SigningScheme::EcdsaP256Sha256 => Some(&ECDSA_P256_SHA256_ASN1_SIGNING),
            SigningScheme::EcdsaP384Sha384 => Some(&ECDSA_P384_SHA384_ASN1_SIGNING),
            SigningScheme::EcdsaP521Sha512 => Some(&ECDSA_P521_SHA512_ASN1_SIGNING),
            SigningScheme::Ed25519 => None,
        }
    }
}

impl std::fmt::Display for SigningScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A key pair for signing
pub enum KeyPair {
    /// ECDSA key pair; the scheme records the curve
    Ecdsa(SigningScheme, EcdsaKeyPair),
    /// Ed25519 key pair
    Ed25519(Ed25519KeyPair),
}

impl KeyPair {
    /// Generate a new key pair for the given scheme
    pub fn generate(scheme: SigningScheme) -> Result<Self> {
        let rng = SystemRandom::new();
        match scheme.ecdsa_signing_algorithm() {
            Some(alg) => {
                let pkcs8 = EcdsaKeyPair::generate_pkcs8(alg, &rng).map_err(|_| {
                    Error::KeyGeneration(format!("failed to generate {} key", scheme))
                })?;
                let key_pair = EcdsaKeyPair::from_pkcs8(alg, pkcs8.as_ref())?;
                Ok(KeyPair::Ecdsa(scheme, key_pair))
            }
            None => Self::generate_ed25519(),
        }
    }

    /// Generate a new ECDSA P-256 key pair
    pub fn generate_ecdsa_p256() -> Result<Self> {
        Self::generate(SigningScheme::EcdsaP256Sha256)
    }

    /// Generate a new ECDSA P-384 key pair
    pub fn generate_ecdsa_p384() -> Result<Self> {
        Self::generate(SigningScheme::EcdsaP384Sha384)
    }

    /// Generate a new ECDSA P-521 key pair
    pub fn generate_ecdsa_p521() -> Result<Self> {
        Self::generate(SigningScheme::EcdsaP521Sha512)
    }

    /// Generate a new Ed25519 key pair
    pub fn generate_ed25519() -> Result<Self> {
        let rng = SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng)
            .map_err(|_| Error::KeyGeneration("failed to generate Ed25519 key".to_string()))?;
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())?;
        Ok(KeyPair::Ed25519(key_pair))
    }

    /// Load a key pair from an unencrypted PKCS#8 document
    pub fn from_pkcs8(scheme: SigningScheme, pkcs8: &[u8]) -> Result<Self> {
        match scheme.ecdsa_signing_algorithm() {
            Some(alg) => Ok(KeyPair::Ecdsa(scheme, EcdsaKeyPair::from_pkcs8(alg, pkcs8)?)),
            None => Ok(KeyPair::Ed25519(Ed25519KeyPair::from_pkcs8(pkcs8)?)),
        }
    }

    /// Get the raw public key bytes
    ///
    /// An uncompressed SEC1 point for ECDSA, 32 bytes for Ed25519.
    pub fn public_key_bytes(&self) -> &[u8] {
        match self {
            KeyPair::Ecdsa(_, kp) => kp.public_key().as_ref(),
            KeyPair::Ed25519(kp) => kp.public_key().as_ref(),
        }
    }

    /// Get the signing scheme for this key pair
    pub fn scheme(&self) -> SigningScheme {
        match self {
            KeyPair::Ecdsa(scheme, _) => *scheme,
            KeyPair::Ed25519(_) => SigningScheme::Ed25519,
        }
    }

    /// Sign data with this key pair
    pub fn sign(&self, data: &[u8]) -> Result<SignatureBytes> {
        match self {
            KeyPair::Ecdsa(scheme, kp) => {
                let rng = SystemRandom::new();
                let sig = kp
                    .sign(&rng, data)
                    .map_err(|_| Error::Signing(format!("{} signing failed", scheme)))?;
                Ok(SignatureBytes::new(sig.as_ref().to_vec()))
            }
            KeyPair::Ed25519(kp) => {
                let sig = kp.sign(data);
                Ok(SignatureBytes::new(sig.as_ref().to_vec()))
            }
        }
    }

    /// Get the public key in DER-encoded SubjectPublicKeyInfo format
    pub fn public_key_to_der(&self) -> Result<DerPublicKey> {
        crate::spki::encode_public_key(self.scheme(), self.public_key_bytes())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("scheme", &self.scheme())
            .finish_non_exhaustive()
    }
}
