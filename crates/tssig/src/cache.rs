//! In-memory caching for root key lookups

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::error::Result;
use crate::key_lookup::KeyLookup;

/// Default time a fetched root key is reused
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Wraps a [`KeyLookup`] and remembers successful responses
///
/// Only successful fetches are stored; a failed lookup is retried by the
/// next caller. Clones share the same cache.
#[derive(Debug, Clone)]
pub struct CachingKeyLookup<L> {
    inner: L,
    ttl: Duration,
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl<L: KeyLookup> CachingKeyLookup<L> {
    /// Cache `inner` with [`DEFAULT_TTL`]
    pub fn new(inner: L) -> Self {
        Self::with_ttl(inner, DEFAULT_TTL)
    }

    /// Cache `inner` with a custom TTL
    pub fn with_ttl(inner: L, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored entries, including expired ones
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every stored entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Drop entries whose TTL has passed
    pub async fn cleanup_expired(&self) {
        self.entries
            .write()
            .await
            .retain(|_, entry| !entry.is_expired());
    }

    async fn cached(&self, url: &str) -> Option<Vec<u8>> {
        let entries = self.entries.read().await;
        match entries.get(url) {
            Some(entry) if !entry.is_expired() => Some(entry.data.clone()),
            Some(_) => {
                drop(entries);
                self.entries.write().await.remove(url);
                None
            }
            None => None,
        }
    }

    async fn lookup(&self, url: &str) -> Result<Vec<u8>> {
        if let Some(data) = self.cached(url).await {
            tracing::debug!(url, "Root key cache hit");
            return Ok(data);
        }

        let data = self.inner.get(url).await?;
        let entry = CacheEntry {
            data: data.clone(),
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = self.entries.write().await;
        entries.retain(|_, cached| !cached.is_expired());
        entries.insert(url.to_string(), entry);
        Ok(data)
    }
}

impl<L: KeyLookup> KeyLookup for CachingKeyLookup<L> {
    fn get<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(self.lookup(url))
    }
}
