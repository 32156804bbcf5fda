//! Verification of signed timestamps
//!
//! A [`SignedTimestamp`] is valid when two signatures check out:
//!
//! 1. the issuer signature, made by a root key fetched from the issuer's
//!    root key URL, over `root_key_url || leaf_public_key`, where the URL
//!    must also pass the trust policy;
//! 2. the timestamp signature, made by the Ed25519 leaf key, over
//!    `digest || rfc3339_nanos(datetime)`.
//!
//! The second check is local and cheap, the first needs a network fetch.
//! [`Verifier::verify`] starts the issuer check in the background, runs the
//! local check, and returns as soon as either one has failed. Outside a tokio
//! runtime there is nothing to spawn onto, so both checks run in sequence.

use crate::error::{Error, Result};
use crate::issuer::IssuerRecord;
use crate::key_lookup::{HttpKeyLookup, KeyLookup};
use crate::stamp::SignedTimestamp;
use crate::trust::TrustedIssuerKeyCheck;
use std::sync::Arc;
use tssig_crypto::{SigningScheme, VerificationKey};

/// Checks signed timestamps against a trust policy
///
/// Cloning is cheap; clones share the key lookup and the trust policy.
#[derive(Clone)]
pub struct Verifier {
    key_lookup: Arc<dyn KeyLookup>,
    trusted_issuers: Arc<dyn TrustedIssuerKeyCheck>,
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier").finish_non_exhaustive()
    }
}

impl Verifier {
    /// Create a verifier that fetches root keys over HTTP
    pub fn new(trusted_issuers: impl TrustedIssuerKeyCheck + 'static) -> Self {
        Self::with_key_lookup(trusted_issuers, HttpKeyLookup::new())
    }

    /// Create a verifier with a custom root key source
    pub fn with_key_lookup(
        trusted_issuers: impl TrustedIssuerKeyCheck + 'static,
        key_lookup: impl KeyLookup + 'static,
    ) -> Self {
        Self {
            key_lookup: Arc::new(key_lookup),
            trusted_issuers: Arc::new(trusted_issuers),
        }
    }

    /// Check that an issuer's leaf key was signed by a trusted root key
    pub async fn verify_issuer(&self, issuer: &IssuerRecord) -> Result<()> {
        if issuer.root_key_url.is_empty() {
            return Err(Error::Validation("issuer has no root key url".to_string()));
        }
        if issuer.leaf_public_key.is_empty() {
            return Err(Error::Validation("issuer has no leaf public key".to_string()));
        }
        if issuer.issuer_signature.is_empty() {
            return Err(Error::Validation("issuer has no signature".to_string()));
        }

        let url = issuer.root_key_url.as_str();
        if !self.trusted_issuers.trusted(url)? {
            tracing::warn!(url, "Issuer root key is not trusted");
            return Err(Error::TrustDenied(url.to_string()));
        }
        tracing::debug!(url, "Issuer root key url is trusted");

        let root_der = self.key_lookup.get(url).await?;
        let root_key = VerificationKey::from_spki_der(&root_der)?;
        tracing::debug!(url, scheme = %root_key.scheme, "Fetched issuer root key");

        root_key
            .verify(&issuer.bytes_to_sign(), issuer.issuer_signature.as_bytes())
            .map_err(|_| Error::InvalidSignature("issuer has invalid signature".to_string()))?;

        tracing::debug!(url, "Issuer signature verified");
        Ok(())
    }

    /// Check the leaf signature on a timestamp
    ///
    /// This does not look at the issuer signature; see [`Verifier::verify`].
    pub fn verify_signed_timestamp(&self, sts: &SignedTimestamp) -> Result<()> {
        let issuer = sts
            .issuer()
            .ok_or_else(|| Error::Validation("timestamp has no issuer".to_string()))?;
        if !sts.is_signed() {
            return Err(Error::Validation("timestamp is not signed".to_string()));
        }
        let message = sts.bytes_to_sign()?;

        let leaf_key = VerificationKey::from_spki_der(issuer.leaf_public_key.as_bytes())
            .map_err(|e| Error::KeyParse(format!("leaf public key: {}", e)))?;
        if leaf_key.scheme != SigningScheme::Ed25519 {
            return Err(Error::KeyParse(format!(
                "leaf public key must be Ed25519, got {}",
                leaf_key.scheme
            )));
        }

        leaf_key
            .verify(&message, sts.signature().as_bytes())
            .map_err(|_| Error::InvalidSignature("stamp has invalid signature".to_string()))?;

        tracing::debug!(digest = %sts.digest().to_base64url(), "Timestamp signature verified");
        Ok(())
    }

    /// Check both the issuer and the timestamp signature
    ///
    /// Inside a tokio runtime the issuer check runs as a separate task. If
    /// the local check fails first, that error is returned immediately and
    /// the issuer task is left to finish on its own; its outcome is
    /// discarded. Without a runtime the local check runs first and the issuer
    /// check only runs if it passed.
    pub async fn verify(&self, sts: &SignedTimestamp) -> Result<()> {
        let record = sts
            .issuer_record()
            .ok_or_else(|| Error::Validation("timestamp has no issuer".to_string()))?;

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No tokio runtime, verifying issuer inline");
            self.verify_signed_timestamp(sts)?;
            return self.verify_issuer(&record).await;
        };

        let verifier = self.clone();
        let issuer_check = runtime.spawn(async move { verifier.verify_issuer(&record).await });

        self.verify_signed_timestamp(sts)?;
        issuer_check.await?
    }

    /// Like [`Verifier::verify`], also requiring the timestamp to cover `digest`
    pub async fn verify_with_digest(
        &self,
        sts: &SignedTimestamp,
        digest: impl AsRef<[u8]>,
    ) -> Result<()> {
        if sts.digest().as_bytes() != digest.as_ref() {
            return Err(Error::DigestMismatch);
        }
        self.verify(sts).await
    }
}
