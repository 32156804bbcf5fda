//! Signed trusted timestamps
//!
//! An [`Issuer`] holds an Ed25519 leaf key whose public half is signed by a
//! root key (via a [`Signer`]). The issuer then signs digests into
//! [`SignedTimestamp`]s. A [`Verifier`] checks a timestamp using nothing but
//! the timestamp itself: it fetches the root key from the URL embedded in
//! the issuer record, checks that URL against a trust policy, and verifies
//! both signatures.
//!
//! ```no_run
//! use tssig::{Digest, Issuer, KeyPair, LocalKeySigner, TrustedIssuerKeys, Verifier};
//!
//! # async fn example() -> tssig::Result<()> {
//! let root = LocalKeySigner::new(
//!     "https://keys.example.com/tssig/root.der",
//!     KeyPair::generate_ecdsa_p256()?,
//! );
//! let mut issuer = Issuer::generate()?;
//! issuer.sign_issuer(&root)?;
//!
//! let sts = issuer.issue(Digest::from([0u8; 32]))?;
//! let json = sts.to_json()?;
//!
//! let verifier = Verifier::new(TrustedIssuerKeys::new(["https://keys.example.com/tssig/"]));
//! let parsed = tssig::SignedTimestamp::from_json(&json)?;
//! verifier.verify_with_digest(&parsed, [0u8; 32]).await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod error;
pub mod issuer;
pub mod key_lookup;
pub mod signer;
pub mod stamp;
pub mod trust;
pub mod verify;

pub use tssig_crypto as crypto;
pub use tssig_types as types;

pub use cache::CachingKeyLookup;
pub use error::{Error, Result};
pub use issuer::{Issuer, IssuerRecord};
pub use key_lookup::{HttpKeyLookup, KeyLookup, StaticKeyLookup, DEFAULT_TIMEOUT, MAX_KEY_SIZE};
pub use signer::{LocalKeySigner, Signer};
pub use stamp::{format_datetime, SignedTimestamp, WIRE_VERSION};
pub use trust::{TrustedIssuerKeyCheck, TrustedIssuerKeys};
pub use verify::Verifier;

pub use tssig_crypto::{KeyPair, SigningScheme};
pub use tssig_types::{Base64Url, DerPublicKey, Digest, SignatureBytes};
