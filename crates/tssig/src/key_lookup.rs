//! Root public key retrieval
//!
//! The verifier fetches the DER-encoded root key from the URL recorded in
//! the issuer. Responses are bounded: root keys are small, and a verifier
//! must never buffer an arbitrarily large body from a URL it was handed by
//! the document it is checking.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Largest root key response accepted, in bytes
pub const MAX_KEY_SIZE: usize = 128;

/// Default per-request timeout for [`HttpKeyLookup`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches DER-encoded public keys by URL
pub trait KeyLookup: Send + Sync {
    /// Fetch the key published at `url`
    fn get<'a>(&'a self, url: &'a str)
        -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

impl<T: KeyLookup + ?Sized> KeyLookup for Arc<T> {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        (**self).get(url)
    }
}

/// Fetches keys over HTTP(S) with a timeout and a size limit
#[derive(Debug, Clone)]
pub struct HttpKeyLookup {
    client: reqwest::Client,
    timeout: Duration,
}

impl Default for HttpKeyLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpKeyLookup {
    /// Create a lookup with [`DEFAULT_TIMEOUT`]
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a lookup with a custom per-request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Create a lookup that reuses an existing client
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// The per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let mut response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Transport(format!(
                "key server returned status {}",
                response.status()
            )));
        }

        if let Some(declared) = response.content_length() {
            if declared > MAX_KEY_SIZE as u64 {
                tracing::warn!(url, declared, "Root key response exceeds size limit");
                return Err(Error::ResourceTooLarge {
                    limit: MAX_KEY_SIZE,
                    declared: Some(declared),
                });
            }
        }

        // Length unknown or within bounds: read until one byte past the limit
        let mut body = Vec::with_capacity(MAX_KEY_SIZE);
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?
        {
            let room = MAX_KEY_SIZE + 1 - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() > MAX_KEY_SIZE {
                tracing::warn!(url, "Root key response exceeds size limit");
                return Err(Error::ResourceTooLarge {
                    limit: MAX_KEY_SIZE,
                    declared: None,
                });
            }
        }

        tracing::debug!(url, len = body.len(), "Fetched root key");
        Ok(body)
    }
}

impl KeyLookup for HttpKeyLookup {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(self.fetch(url))
    }
}

/// Serves keys from a fixed in-memory table
///
/// Useful for pinning root keys ahead of time, or for offline verification.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyLookup {
    keys: HashMap<String, Vec<u8>>,
}

impl StaticKeyLookup {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key, returning the table for chaining
    pub fn with_key(mut self, url: impl Into<String>, der: impl Into<Vec<u8>>) -> Self {
        self.insert(url, der);
        self
    }

    /// Add or replace a key
    pub fn insert(&mut self, url: impl Into<String>, der: impl Into<Vec<u8>>) {
        self.keys.insert(url.into(), der.into());
    }
}

impl KeyLookup for StaticKeyLookup {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        let found = self
            .keys
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Transport(format!("no key registered for {}", url)));
        Box::pin(async move { found })
    }
}
