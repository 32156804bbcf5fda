//! Issuers: leaf keys attested by a root key
//!
//! An [`Issuer`] owns an Ed25519 leaf key pair. Before it can stamp anything
//! its leaf public key must be signed by a root key through a [`Signer`];
//! the resulting [`IssuerRecord`] is the public, serializable part that
//! travels inside every timestamp the issuer produces.
//!
//! The leaf private key is a private field with no accessor and no serde
//! implementation, so it can only be used by [`Issuer::sign_timestamp`].

use crate::error::{Error, Result};
use crate::signer::Signer;
use crate::stamp::SignedTimestamp;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tssig_crypto::{KeyPair, SigningScheme};
use tssig_types::{DerPublicKey, Digest, SignatureBytes};

/// The public attestation binding a leaf key to a root key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct IssuerRecord {
    /// Where the root public key is published; also the trust-policy subject
    pub root_key_url: String,
    /// DER-encoded SubjectPublicKeyInfo of the leaf key
    pub leaf_public_key: DerPublicKey,
    /// Root signature over `root_key_url || leaf_public_key`
    pub issuer_signature: SignatureBytes,
}

impl IssuerRecord {
    /// The bytes covered by the issuer signature
    pub fn bytes_to_sign(&self) -> Vec<u8> {
        attestation_message(&self.root_key_url, &self.leaf_public_key)
    }

    /// Whether the record carries a root key URL and a signature
    pub fn is_signed(&self) -> bool {
        !self.root_key_url.is_empty() && !self.issuer_signature.is_empty()
    }
}

fn attestation_message(root_key_url: &str, leaf_public_key: &DerPublicKey) -> Vec<u8> {
    let mut message = Vec::with_capacity(root_key_url.len() + leaf_public_key.as_bytes().len());
    message.extend_from_slice(root_key_url.as_bytes());
    message.extend_from_slice(leaf_public_key.as_bytes());
    message
}

/// An entity that signs timestamps with a root-attested leaf key
#[derive(Debug)]
pub struct Issuer {
    record: Arc<IssuerRecord>,
    leaf_key: KeyPair,
}

impl Issuer {
    /// Create an unsigned issuer around an Ed25519 leaf key pair
    ///
    /// The public half is DER-encoded immediately. Non-Ed25519 leaf keys are
    /// rejected; verifiers only accept Ed25519 leaf keys.
    pub fn new(leaf_key: KeyPair) -> Result<Self> {
        if leaf_key.scheme() != SigningScheme::Ed25519 {
            return Err(Error::UnsupportedAlgorithm(format!(
                "leaf keys must be Ed25519, got {}",
                leaf_key.scheme()
            )));
        }

        let leaf_public_key = leaf_key
            .public_key_to_der()
            .map_err(|e| Error::Encoding(e.to_string()))?;

        Ok(Self {
            record: Arc::new(IssuerRecord {
                leaf_public_key,
                ..Default::default()
            }),
            leaf_key,
        })
    }

    /// Create an unsigned issuer with a freshly generated leaf key
    pub fn generate() -> Result<Self> {
        Self::new(KeyPair::generate_ed25519()?)
    }

    /// The public attestation record
    pub fn record(&self) -> &IssuerRecord {
        &self.record
    }

    /// Whether [`Issuer::sign_issuer`] has completed
    pub fn is_signed(&self) -> bool {
        self.record.is_signed()
    }

    /// Have `signer` attest the leaf public key with its root key
    ///
    /// Asks the signer for its key URL, then for a signature over
    /// `key_url || leaf_public_key`. The issuer is only updated once both
    /// succeed. Calling this again replaces the previous attestation;
    /// timestamps already issued keep the record they were signed under.
    pub fn sign_issuer<S: Signer + ?Sized>(&mut self, signer: &S) -> Result<()> {
        let root_key_url = signer.key_url()?;
        if root_key_url.is_empty() {
            return Err(Error::Validation(
                "signer returned an empty key url".to_string(),
            ));
        }

        let message = attestation_message(&root_key_url, &self.record.leaf_public_key);
        let issuer_signature = signer.sign(&message)?;
        if issuer_signature.is_empty() {
            return Err(Error::Signing("signer returned an empty signature".to_string()));
        }

        tracing::debug!(root_key_url = %root_key_url, "issuer signed");

        self.record = Arc::new(IssuerRecord {
            root_key_url,
            leaf_public_key: self.record.leaf_public_key.clone(),
            issuer_signature,
        });
        Ok(())
    }

    /// Sign a timestamp with the leaf key
    ///
    /// Sets the timestamp's issuer and datetime (now, UTC) and signs
    /// `digest || rfc3339_nanos(datetime)`. Fails if this issuer has not been
    /// signed yet or if the timestamp already carries a signature.
    pub fn sign_timestamp(&self, sts: &mut SignedTimestamp) -> Result<()> {
        if !self.is_signed() {
            return Err(Error::Precondition(
                "issuer needs signing before it can be used".to_string(),
            ));
        }
        if sts.is_signed() {
            return Err(Error::Precondition(
                "timestamp has already been signed".to_string(),
            ));
        }

        let datetime = chrono::Utc::now();
        let message = SignedTimestamp::message(sts.digest(), &datetime);
        let signature = self.leaf_key.sign(&message)?;

        sts.seal(Arc::clone(&self.record), datetime, signature);
        Ok(())
    }

    /// Create and sign a timestamp for `digest` in one step
    pub fn issue(&self, digest: Digest) -> Result<SignedTimestamp> {
        let mut sts = SignedTimestamp::new(digest);
        self.sign_timestamp(&mut sts)?;
        Ok(sts)
    }
}
