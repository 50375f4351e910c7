//! Short-lived response cache in front of the petitions API.
//!
//! Entries are keyed by the full endpoint path (query string included) and
//! are served while younger than the TTL. Expired entries are purged
//! whenever a new payload is stored; if the cache is still full after that,
//! the oldest entry is evicted.
//!
//! Concurrent misses for the same endpoint are not coalesced: each caller
//! performs its own upstream request.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use petitions_core::clock::Clock;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::api::{SourceError, UpstreamFetch};

/// Default time a payload stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Default upper bound on cached endpoints.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

struct CachedResponse {
    payload: Value,
    captured_at: Instant,
}

impl CachedResponse {
    fn is_fresh(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.captured_at) < ttl
    }
}

/// TTL cache wrapping an [`UpstreamFetch`].
///
/// Thread-safe via interior `RwLock`; the lock is never held across an
/// upstream request.
pub struct FetchCache {
    fetcher: Arc<dyn UpstreamFetch>,
    clock: Arc<dyn Clock>,
    config: CacheConfig,
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl FetchCache {
    pub fn new(fetcher: Arc<dyn UpstreamFetch>, clock: Arc<dyn Clock>, config: CacheConfig) -> Self {
        Self {
            fetcher,
            clock,
            config: CacheConfig {
                max_entries: config.max_entries.max(1),
                ..config
            },
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the payload for `endpoint`, from cache while fresh, otherwise
    /// from upstream. Failed fetches are not cached.
    pub async fn get(&self, endpoint: &str) -> Result<Value, SourceError> {
        let now = self.clock.now();
        let cached = {
            let entries = self.entries.read().await;
            entries
                .get(endpoint)
                .filter(|entry| entry.is_fresh(now, self.config.ttl))
                .map(|entry| entry.payload.clone())
        };

        if let Some(payload) = cached {
            tracing::debug!(endpoint, "Petition cache hit");
            return Ok(payload);
        }

        tracing::debug!(endpoint, "Petition cache miss");
        let payload = self.fetcher.fetch_json(endpoint).await?;
        self.store(endpoint, payload.clone()).await;
        Ok(payload)
    }

    /// Number of entries currently held, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn store(&self, endpoint: &str, payload: Value) {
        let now = self.clock.now();
        let ttl = self.config.ttl;
        let mut entries = self.entries.write().await;

        entries.retain(|_, entry| entry.is_fresh(now, ttl));

        if entries.len() >= self.config.max_entries && !entries.contains_key(endpoint) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.captured_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
                tracing::debug!(evicted = %key, "Petition cache full, evicted oldest entry");
            }
        }

        entries.insert(
            endpoint.to_string(),
            CachedResponse {
                payload,
                captured_at: now,
            },
        );
    }
}
