//! SubjectPublicKeyInfo encoding and decoding
//!
//! Public keys travel as DER-encoded SPKI, both on the wire (the leaf key)
//! and at the root key URL. Decoding recovers the signing scheme from the
//! algorithm identifier so verification can dispatch on it.

use crate::error::{Error, Result};
use crate::signing::SigningScheme;
use const_oid::db::rfc5912::{
    ID_EC_PUBLIC_KEY, SECP_224_R_1, SECP_256_R_1, SECP_384_R_1, SECP_521_R_1,
};
use const_oid::db::rfc8410::ID_ED_25519;
use const_oid::ObjectIdentifier;
use der::asn1::BitString;
use der::Encode;
use spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned, SubjectPublicKeyInfoRef};
use tssig_types::DerPublicKey;

/// Encode raw public key bytes as a DER SubjectPublicKeyInfo
pub fn encode_public_key(scheme: SigningScheme, public_key: &[u8]) -> Result<DerPublicKey> {
    let algorithm = match scheme {
        SigningScheme::Ed25519 => AlgorithmIdentifierOwned {
            oid: ID_ED_25519,
            parameters: None,
        },
        ecdsa => {
            let curve = curve_oid(ecdsa)?;
            AlgorithmIdentifierOwned {
                oid: ID_EC_PUBLIC_KEY,
                parameters: Some(
                    der::Any::encode_from(&curve).map_err(|e| Error::Der(e.to_string()))?,
                ),
            }
        }
    };

    let spki = SubjectPublicKeyInfoOwned {
        algorithm,
        subject_public_key: BitString::from_bytes(public_key)
            .map_err(|e| Error::Der(e.to_string()))?,
    };

    let der = spki.to_der().map_err(|e| Error::Der(e.to_string()))?;
    Ok(DerPublicKey::new(der))
}

/// Decode a DER SubjectPublicKeyInfo into its scheme and raw key bytes
pub fn decode_public_key(der: &[u8]) -> Result<(SigningScheme, Vec<u8>)> {
    let spki = SubjectPublicKeyInfoRef::try_from(der)
        .map_err(|e| Error::InvalidKeyFormat(format!("failed to parse SPKI: {}", e)))?;

    let scheme = if spki.algorithm.oid == ID_ED_25519 {
        if spki.algorithm.parameters.is_some() {
            return Err(Error::InvalidKeyFormat(
                "Ed25519 key must not carry algorithm parameters".to_string(),
            ));
        }
        SigningScheme::Ed25519
    } else if spki.algorithm.oid == ID_EC_PUBLIC_KEY {
        let params = spki.algorithm.parameters.ok_or_else(|| {
            Error::InvalidKeyFormat("EC key missing curve parameters".to_string())
        })?;
        let curve = params.decode_as::<ObjectIdentifier>().map_err(|e| {
            Error::InvalidKeyFormat(format!("failed to parse EC curve OID: {}", e))
        })?;
        SigningScheme::for_ecdsa_bits(curve_bits(curve)?)?
    } else {
        tracing::debug!("Unknown public key algorithm OID: {}", spki.algorithm.oid);
        return Err(Error::UnsupportedAlgorithm(format!(
            "unknown key type with algorithm OID {}",
            spki.algorithm.oid
        )));
    };

    let raw = spki.subject_public_key.as_bytes().ok_or_else(|| {
        Error::InvalidKeyFormat("public key bit string has unused bits".to_string())
    })?;

    Ok((scheme, raw.to_vec()))
}

fn curve_oid(scheme: SigningScheme) -> Result<ObjectIdentifier> {
    match scheme {
        SigningScheme::EcdsaP256Sha256 => Ok(SECP_256_R_1),
        SigningScheme::EcdsaP384Sha384 => Ok(SECP_384_R_1),
        SigningScheme::EcdsaP521Sha512 => Ok(SECP_521_R_1),
        SigningScheme::Ed25519 => Err(Error::UnsupportedAlgorithm(
            "Ed25519 has no EC curve".to_string(),
        )),
    }
}

/// Bit size of a named NIST prime curve
///
/// Sizes without a hash assignment are rejected afterwards by
/// [`SigningScheme::for_ecdsa_bits`].
fn curve_bits(curve: ObjectIdentifier) -> Result<usize> {
    if curve == SECP_224_R_1 {
        Ok(224)
    } else if curve == SECP_256_R_1 {
        Ok(256)
    } else if curve == SECP_384_R_1 {
        Ok(384)
    } else if curve == SECP_521_R_1 {
        Ok(521)
    } else {
        Err(Error::UnsupportedAlgorithm(format!(
            "unknown EC curve OID {}",
            curve
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::KeyPair;

    #[test]
    fn test_ed25519_spki_layout() {
        let kp = KeyPair::generate_ed25519().unwrap();
        let der = kp.public_key_to_der().unwrap();

        // 30 2a 30 05 06 03 2b 65 70 03 21 00 || key
        assert_eq!(der.as_bytes().len(), 44);
        assert_eq!(
            &der.as_bytes()[..12],
            &[0x30, 0x2a, 0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70, 0x03, 0x21, 0x00]
        );
        assert_eq!(&der.as_bytes()[12..], kp.public_key_bytes());
    }

    #[test]
    fn test_ecdsa_p256_spki_size() {
        let kp = KeyPair::generate_ecdsa_p256().unwrap();
        let der = kp.public_key_to_der().unwrap();
        assert_eq!(der.as_bytes().len(), 91);
    }

    #[test]
    fn test_decode_recovers_scheme() {
        for kp in [
            KeyPair::generate_ecdsa_p256().unwrap(),
            KeyPair::generate_ecdsa_p384().unwrap(),
            KeyPair::generate_ecdsa_p521().unwrap(),
            KeyPair::generate_ed25519().unwrap(),
        ] {
            let der = kp.public_key_to_der().unwrap();
            let (scheme, raw) = decode_public_key(der.as_bytes()).unwrap();
            assert_eq!(scheme, kp.scheme());
            assert_eq!(raw, kp.public_key_bytes());
        }
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_public_key(b"not a key"),
            Err(Error::InvalidKeyFormat(_))
        ));
        assert!(matches!(
            decode_public_key(&[]),
            Err(Error::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn test_decode_rejects_trailing_data() {
        let kp = KeyPair::generate_ed25519().unwrap();
        let mut der = kp.public_key_to_der().unwrap().into_bytes();
        der.push(0);
        assert!(decode_public_key(&der).is_err());
    }

    #[test]
    fn test_decode_unsupported_curve_size() {
        // P-224 SPKI with a dummy 57-byte point
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: ID_EC_PUBLIC_KEY,
                parameters: Some(der::Any::encode_from(&SECP_224_R_1).unwrap()),
            },
            subject_public_key: BitString::from_bytes(&[4u8; 57]).unwrap(),
        };
        let der = spki.to_der().unwrap();
        assert!(matches!(
            decode_public_key(&der),
            Err(Error::UnsupportedKeySize(224))
        ));
    }

    #[test]
    fn test_decode_requires_oid_curve_parameter() {
        // Curve OID content bytes wrapped in an OCTET STRING instead of an OID
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: ID_EC_PUBLIC_KEY,
                parameters: Some(
                    der::Any::new(der::Tag::OctetString, SECP_256_R_1.as_bytes()).unwrap(),
                ),
            },
            subject_public_key: BitString::from_bytes(&[4u8; 65]).unwrap(),
        };
        let der = spki.to_der().unwrap();
        assert!(matches!(
            decode_public_key(&der),
            Err(Error::InvalidKeyFormat(_))
        ));
    }

    #[test]
    fn test_decode_unknown_algorithm() {
        // id-X25519 (1.3.101.110) is a key agreement algorithm
        let spki = SubjectPublicKeyInfoOwned {
            algorithm: AlgorithmIdentifierOwned {
                oid: ObjectIdentifier::new_unwrap("1.3.101.110"),
                parameters: None,
            },
            subject_public_key: BitString::from_bytes(&[9u8; 32]).unwrap(),
        };
        let der = spki.to_der().unwrap();
        assert!(matches!(
            decode_public_key(&der),
            Err(Error::UnsupportedAlgorithm(_))
        ));
    }
}
