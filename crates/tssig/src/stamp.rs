//! Signed timestamps and their JSON wire form

use crate::error::{Error, Result};
use crate::issuer::IssuerRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tssig_types::{Digest, SignatureBytes};

/// Version tag carried by every wire document
pub const WIRE_VERSION: &str = "tssig/v1";

/// A digest bound to a point in time by an issuer's leaf key
///
/// Created unsigned with [`SignedTimestamp::new`]; the issuer fields, the
/// datetime and the signature are filled in exactly once by
/// [`Issuer::sign_timestamp`](crate::Issuer::sign_timestamp).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTimestamp {
    issuer: Option<Arc<IssuerRecord>>,
    datetime: Option<DateTime<Utc>>,
    digest: Digest,
    signature: SignatureBytes,
}

impl SignedTimestamp {
    /// Create an unsigned timestamp for a digest
    pub fn new(digest: Digest) -> Self {
        Self {
            issuer: None,
            datetime: None,
            digest,
            signature: SignatureBytes::default(),
        }
    }

    /// Create an unsigned timestamp from a base64url-encoded digest
    pub fn from_base64url(digest: &str) -> Result<Self> {
        Ok(Self::new(Digest::from_base64url(digest)?))
    }

    /// The record of the issuer that signed this timestamp
    pub fn issuer(&self) -> Option<&IssuerRecord> {
        self.issuer.as_deref()
    }

    pub(crate) fn issuer_record(&self) -> Option<Arc<IssuerRecord>> {
        self.issuer.clone()
    }

    /// When the timestamp was signed
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.datetime
    }

    /// The timestamped digest
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// The leaf key signature; empty until signed
    pub fn signature(&self) -> &SignatureBytes {
        &self.signature
    }

    /// Whether a signature has been attached
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// The bytes covered by the leaf signature: `digest || rfc3339_nanos(datetime)`
    pub fn bytes_to_sign(&self) -> Result<Vec<u8>> {
        let datetime = self
            .datetime
            .ok_or_else(|| Error::Validation("timestamp has no datetime".to_string()))?;
        Ok(Self::message(&self.digest, &datetime))
    }

    pub(crate) fn message(digest: &Digest, datetime: &DateTime<Utc>) -> Vec<u8> {
        let formatted = format_datetime(datetime);
        let mut message = Vec::with_capacity(digest.len() + formatted.len());
        message.extend_from_slice(digest.as_bytes());
        message.extend_from_slice(formatted.as_bytes());
        message
    }

    pub(crate) fn seal(
        &mut self,
        issuer: Arc<IssuerRecord>,
        datetime: DateTime<Utc>,
        signature: SignatureBytes,
    ) {
        self.issuer = Some(issuer);
        self.datetime = Some(datetime);
        self.signature = signature;
    }

    /// Serialize to the compact JSON wire document
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_document()?)?)
    }

    /// Serialize to the indented JSON wire document
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_document()?)?)
    }

    /// Parse a JSON wire document
    ///
    /// Only the canonical form is accepted: version `tssig/v1`, unpadded
    /// base64url, and a UTC datetime with exactly nine fractional digits.
    /// No signature is checked here; use a [`Verifier`](crate::Verifier).
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: TimestampDocument = serde_json::from_str(json)?;
        if doc.version != WIRE_VERSION {
            return Err(Error::Validation(format!(
                "unsupported timestamp version {:?}, expected {:?}",
                doc.version, WIRE_VERSION
            )));
        }

        let datetime = parse_datetime(&doc.datetime)?;

        Ok(Self {
            issuer: Some(Arc::new(doc.issuer)),
            datetime: Some(datetime),
            digest: doc.digest,
            signature: doc.signature,
        })
    }

    fn to_document(&self) -> Result<TimestampDocument> {
        let (Some(issuer), Some(datetime)) = (&self.issuer, &self.datetime) else {
            return Err(Error::Precondition(
                "only signed timestamps can be serialized".to_string(),
            ));
        };

        Ok(TimestampDocument {
            version: WIRE_VERSION.to_string(),
            issuer: IssuerRecord::clone(issuer),
            datetime: format_datetime(datetime),
            digest: self.digest.clone(),
            signature: self.signature.clone(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct TimestampDocument {
    version: String,
    issuer: IssuerRecord,
    datetime: String,
    digest: Digest,
    signature: SignatureBytes,
}

/// RFC 3339 UTC with nanosecond precision, e.g. `2024-05-01T12:00:00.000000000Z`
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let datetime = DateTime::parse_from_rfc3339(s)
        .map_err(|e| Error::Validation(format!("invalid datetime {:?}: {}", s, e)))?
        .with_timezone(&Utc);

    // The signature covers the formatted string, so only one spelling is valid
    if format_datetime(&datetime) != s {
        return Err(Error::Validation(format!(
            "datetime {:?} is not in canonical form",
            s
        )));
    }
    Ok(datetime)
}
