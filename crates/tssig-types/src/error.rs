//! Error types for tssig-types

use thiserror::Error;

/// Errors that can occur in tssig-types
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid encoding
    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    /// Digest length does not match any supported hash output size
    #[error("digest must be exactly 224, 256, 384, or 512 bits, {} bits found", .0 * 8)]
    InvalidDigestLength(usize),
}

/// Result type for tssig-types operations
pub type Result<T> = std::result::Result<T, Error>;
