//! Cryptographic primitives for TSSig
//!
//! This crate provides key generation, signing, SPKI encoding, and
//! verification functionality using aws-lc-rs as the cryptographic backend.
//! Signing and verification share a single scheme table so the hash chosen
//! for a key is always the same on both sides.

pub mod error;
pub mod hash;
pub mod signing;
pub mod spki;
pub mod verification;

pub use error::{Error, Result};
pub use hash::{digest, sha224, sha256, sha384, sha512};
pub use signing::{KeyPair, SigningScheme};
pub use verification::{verify_signature, VerificationKey};
