//! Core types and wire encodings for TSSig
//!
//! This crate provides the value types shared by the signing and verification
//! crates: caller digests with enforced lengths, base64url encoding wrappers,
//! and DER/signature byte newtypes that serialize as base64url text.

pub mod encoding;
pub mod error;
pub mod hash;

// Re-export base64url_bytes for internal use
pub(crate) use encoding::base64url_bytes;

pub use encoding::{Base64Url, DerPublicKey, SignatureBytes};
pub use error::{Error, Result};
pub use hash::{Digest, HashAlgorithm};
