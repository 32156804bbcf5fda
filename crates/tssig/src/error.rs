//! Error types for tssig

use thiserror::Error;

/// Errors that can occur while issuing or verifying signed timestamps
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing required field
    #[error("Validation error: {0}")]
    Validation(String),

    /// DER/ASN.1 encoding failure
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Public key DER could not be decoded
    #[error("Key parse error: {0}")]
    KeyParse(String),

    /// Public key algorithm is not one we can verify with
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// ECDSA curve size with no hash assignment
    #[error("invalid key size - must be 256, 384 or 521. {0} found")]
    UnsupportedKeySize(usize),

    /// Key algorithm not usable for the requested role
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Root key URL rejected by the trust policy
    #[error("issuer key {0} is not trusted")]
    TrustDenied(String),

    /// Fetching the root key failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Root key response exceeded the size limit
    #[error("the maximum allowed key size is {limit} bytes, the returned key is bigger")]
    ResourceTooLarge {
        /// Maximum number of bytes accepted
        limit: usize,
        /// Length declared by the server, if any
        declared: Option<u64>,
    },

    /// Signature did not verify
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Expected digest differs from the timestamped one
    #[error("the passed digest does not match the one associated with the time stamp")]
    DigestMismatch,

    /// Operation attempted out of order
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Producing a signature failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The background issuer check did not complete
    #[error("Issuer verification task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<tssig_types::Error> for Error {
    fn from(e: tssig_types::Error) -> Self {
        Error::Validation(e.to_string())
    }
}

impl From<tssig_crypto::Error> for Error {
    fn from(e: tssig_crypto::Error) -> Self {
        use tssig_crypto::Error as Crypto;
        match e {
            Crypto::Verification(msg) => Error::InvalidSignature(msg),
            Crypto::InvalidKeyFormat(msg) => Error::KeyParse(msg),
            Crypto::UnsupportedAlgorithm(msg) => Error::UnsupportedKeyType(msg),
            Crypto::UnsupportedKeySize(bits) => Error::UnsupportedKeySize(bits),
            Crypto::Der(msg) => Error::Encoding(msg),
            Crypto::KeyGeneration(msg) | Crypto::Signing(msg) | Crypto::AwsLc(msg) => {
                Error::Signing(msg)
            }
        }
    }
}

/// Result type for tssig operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_errors_map_to_taxonomy() {
        assert!(matches!(
            Error::from(tssig_crypto::Error::InvalidKeyFormat("x".into())),
            Error::KeyParse(_)
        ));
        assert!(matches!(
            Error::from(tssig_crypto::Error::UnsupportedKeySize(224)),
            Error::UnsupportedKeySize(224)
        ));
        assert!(matches!(
            Error::from(tssig_crypto::Error::Verification("x".into())),
            Error::InvalidSignature(_)
        ));
    }

    #[test]
    fn test_digest_length_is_a_validation_error() {
        let err: Error = tssig_types::Digest::new(vec![0u8; 33]).unwrap_err().into();
        assert!(matches!(err, Error::Validation(_)));
    }
}
