//! Signature verification using aws-lc-rs

use crate::error::{Error, Result};
use crate::signing::SigningScheme;
use aws_lc_rs::signature::{
    UnparsedPublicKey, VerificationAlgorithm, ECDSA_P256_SHA256_ASN1, ECDSA_P384_SHA384_ASN1,
    ECDSA_P521_SHA512_ASN1, ED25519,
};

/// A public key for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationKey {
    /// Raw public key bytes
    pub bytes: Vec<u8>,
    /// The scheme to use for verification
    pub scheme: SigningScheme,
}

impl VerificationKey {
    /// Create a new verification key
    pub fn new(bytes: Vec<u8>, scheme: SigningScheme) -> Self {
        Self { bytes, scheme }
    }

    /// Parse a DER-encoded SubjectPublicKeyInfo, detecting the scheme
    pub fn from_spki_der(der: &[u8]) -> Result<Self> {
        let (scheme, bytes) = crate::spki::decode_public_key(der)?;
        Ok(Self { bytes, scheme })
    }

    /// Verify a signature over data
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let algorithm: &'static dyn VerificationAlgorithm = match self.scheme {
            SigningScheme::EcdsaP256Sha256 => &ECDSA_P256_SHA256_ASN1,
            SigningScheme::EcdsaP384Sha384 => &ECDSA_P384_SHA384_ASN1,
            SigningScheme::EcdsaP521Sha512 => &ECDSA_P521_SHA512_ASN1,
            SigningScheme::Ed25519 => &ED25519,
        };

        UnparsedPublicKey::new(algorithm, &self.bytes)
            .verify(data, signature)
            .map_err(|_| Error::Verification(format!("{} signature invalid", self.scheme)))
    }
}

/// Verify a signature with a DER-encoded SubjectPublicKeyInfo key
///
/// The scheme is taken from the key's algorithm identifier.
pub fn verify_signature(public_key_der: &[u8], data: &[u8], signature: &[u8]) -> Result<()> {
    VerificationKey::from_spki_der(public_key_der)?.verify(data, signature)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::KeyPair;

    #[test]
    fn test_verify_every_scheme() {
        for kp in [
            KeyPair::generate_ecdsa_p256().unwrap(),
            KeyPair::generate_ecdsa_p384().unwrap(),
            KeyPair::generate_ecdsa_p521().unwrap(),
            KeyPair::generate_ed25519().unwrap(),
        ] {
            let data = b"test data";
            let sig = kp.sign(data).unwrap();
            let der = kp.public_key_to_der().unwrap();
            assert!(
                verify_signature(der.as_bytes(), data, sig.as_bytes()).is_ok(),
                "{} failed",
                kp.scheme()
            );
        }
    }

    #[test]
    fn test_verify_bad_signature() {
        let kp = KeyPair::generate_ed25519().unwrap();
        let vk = VerificationKey::new(kp.public_key_bytes().to_vec(), SigningScheme::Ed25519);
        assert!(matches!(
            vk.verify(b"test data", &[0u8; 64]),
            Err(Error::Verification(_))
        ));
    }

    #[test]
    fn test_verify_wrong_data() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let sig = kp.sign(b"test data").unwrap();
        let der = kp.public_key_to_der().unwrap();
        assert!(matches!(
            verify_signature(der.as_bytes(), b"wrong data", sig.as_bytes()),
            Err(Error::Verification(_))
        ));
    }

    #[test]
    fn test_verify_with_other_key() {
        let signer = KeyPair::generate_ecdsa_p384().unwrap();
        let other = KeyPair::generate_ecdsa_p384().unwrap();
        let sig = signer.sign(b"test data").unwrap();
        let der = other.public_key_to_der().unwrap();
        assert!(verify_signature(der.as_bytes(), b"test data", sig.as_bytes()).is_err());
    }

    #[test]
    fn test_from_spki_der_reports_scheme() {
        let kp = KeyPair::generate_ecdsa_p521().unwrap();
        let der = kp.public_key_to_der().unwrap();
        let vk = VerificationKey::from_spki_der(der.as_bytes()).unwrap();
        assert_eq!(vk.scheme, SigningScheme::EcdsaP521Sha512);
    }
}
