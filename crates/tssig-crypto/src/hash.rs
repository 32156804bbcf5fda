//! Hashing utilities using aws-lc-rs
//!
//! Callers use these to produce the digests they timestamp.

use aws_lc_rs::digest::{self, SHA224, SHA256, SHA384, SHA512};
use tssig_types::{Digest, HashAlgorithm};

/// Hash data using SHA-224
pub fn sha224(data: &[u8]) -> [u8; 28] {
    let digest = digest::digest(&SHA224, data);
    let mut result = [0u8; 28];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Hash data using SHA-256
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let digest = digest::digest(&SHA256, data);
    let mut result = [0u8; 32];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Hash data using SHA-384
pub fn sha384(data: &[u8]) -> [u8; 48] {
    let digest = digest::digest(&SHA384, data);
    let mut result = [0u8; 48];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Hash data using SHA-512
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let digest = digest::digest(&SHA512, data);
    let mut result = [0u8; 64];
    result.copy_from_slice(digest.as_ref());
    result
}

/// Hash data into a [`Digest`] ready to be timestamped
pub fn digest(algorithm: HashAlgorithm, data: &[u8]) -> Digest {
    match algorithm {
        HashAlgorithm::Sha2224 => sha224(data).into(),
        HashAlgorithm::Sha2256 => sha256(data).into(),
        HashAlgorithm::Sha2384 => sha384(data).into(),
        HashAlgorithm::Sha2512 => sha512(data).into(),
    }
}
