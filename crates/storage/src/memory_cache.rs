//! In-memory LRU response store.
//!
//! Used when no Redis instance is configured (local runs, the CLI, tests).
//! Entries expire lazily on read; when the entry limit is reached the least
//! recently used entry is evicted.

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;

use aquifer_common::AquiferResult;

use crate::store::ResponseStore;

/// Entry limit used when the configured value is zero.
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// In-memory LRU store with per-entry TTL.
#[derive(Clone)]
pub struct MemoryResponseStore {
    cache: Arc<Mutex<LruCache<String, CachedResponse>>>,
    stats: Arc<MemoryCacheStats>,
}

struct CachedResponse {
    data: Bytes,
    inserted_at: Instant,
    ttl: Duration,
}

impl CachedResponse {
    fn is_expired(&self) -> bool {
        self.inserted_at.elapsed() >= self.ttl
    }
}

/// Counters for the in-memory store.
#[derive(Default)]
pub struct MemoryCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    /// Entries dropped by TTL on read
    pub expired: AtomicU64,
    /// Entries dropped to stay under the entry limit
    pub evictions: AtomicU64,
}

impl MemoryCacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn expired(&self) -> u64 {
        self.expired.load(Ordering::Relaxed)
    }

    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }

    /// Cache hit rate as a percentage (0-100).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}

impl MemoryResponseStore {
    /// Create a store holding at most `max_entries` responses.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries)
            .or_else(|| NonZeroUsize::new(DEFAULT_MAX_ENTRIES))
            .unwrap_or(NonZeroUsize::MIN);

        Self {
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
            stats: Arc::new(MemoryCacheStats::default()),
        }
    }

    pub fn stats(&self) -> &MemoryCacheStats {
        &self.stats
    }

    /// Number of stored entries, expired ones included until they are read.
    pub async fn len(&self) -> usize {
        self.cache.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for MemoryResponseStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

#[async_trait]
impl ResponseStore for MemoryResponseStore {
    async fn get(&self, key: &str) -> AquiferResult<Option<Bytes>> {
        let mut cache = self.cache.lock().await;

        let hit = match cache.get(key) {
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.data.clone()),
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                return Ok(None);
            }
        };

        match hit {
            Some(data) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(data))
            }
            None => {
                cache.pop(key);
                self.stats.expired.fetch_add(1, Ordering::Relaxed);
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                debug!(key = key, "Expired in-memory cache entry");
                Ok(None)
            }
        }
    }

    async fn set_ex(&self, key: &str, value: Bytes, ttl: Duration) -> AquiferResult<()> {
        let mut cache = self.cache.lock().await;

        let entry = CachedResponse {
            data: value,
            inserted_at: Instant::now(),
            ttl,
        };

        if let Some((evicted_key, _)) = cache.push(key.to_string(), entry) {
            if evicted_key != key {
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
