//! Trust policy for root key URLs

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decides whether a root key URL may vouch for issuers
pub trait TrustedIssuerKeyCheck: Send + Sync {
    /// Whether keys published at `url` are trusted
    fn trusted(&self, url: &str) -> Result<bool>;
}

impl<T: TrustedIssuerKeyCheck + ?Sized> TrustedIssuerKeyCheck for Arc<T> {
    fn trusted(&self, url: &str) -> Result<bool> {
        (**self).trusted(url)
    }
}

/// Trusts root key URLs that start with one of a set of prefixes
///
/// Matching is a plain byte-prefix test, so a prefix should end at a path
/// boundary (`https://keys.example.com/` rather than
/// `https://keys.example.com`). Empty prefixes are ignored and an empty set
/// trusts nothing.
///
/// ```
/// use tssig::{TrustedIssuerKeyCheck, TrustedIssuerKeys};
///
/// let trust: TrustedIssuerKeys =
///     serde_json::from_str(r#"{"key-prefixes": ["https://keys.example.com/"]}"#).unwrap();
/// assert!(trust.trusted("https://keys.example.com/root.der").unwrap());
/// assert!(!trust.trusted("https://keys.example.org/root.der").unwrap());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TrustedIssuerKeys {
    /// Accepted URL prefixes
    #[serde(default)]
    pub key_prefixes: Vec<String>,
}

impl TrustedIssuerKeys {
    /// Trust the given prefixes
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl TrustedIssuerKeyCheck for TrustedIssuerKeys {
    fn trusted(&self, url: &str) -> Result<bool> {
        Ok(self
            .key_prefixes
            .iter()
            .any(|prefix| !prefix.is_empty() && url.starts_with(prefix.as_str())))
    }
}
