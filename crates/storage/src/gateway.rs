//! Content-addressed cache in front of upstream GetFeatureInfo requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use metrics::counter;
use tracing::{debug, info, warn};

use aquifer_common::{AquiferResult, RawResponse};
use wms_protocol::RequestParams;

use crate::store::ResponseStore;

/// Lifetime of a cached upstream response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const KEY_PREFIX: &str = "aquifer:gfi:";

/// Cache key for a fully expanded parameter set.
///
/// The key hashes the canonical (key-sorted, encoded) parameter string, so
/// it does not depend on the order in which parameters were added.
pub fn cache_key(params: &RequestParams) -> AquiferResult<String> {
    let canonical = params.canonical_string()?;
    Ok(format!(
        "{}{:x}",
        KEY_PREFIX,
        md5::compute(canonical.as_bytes())
    ))
}

/// Owns the lifecycle of cached responses.
///
/// A gateway without a store passes every call straight through to `fetch`.
#[derive(Clone)]
pub struct CacheGateway {
    store: Option<Arc<dyn ResponseStore>>,
    ttl: Duration,
}

impl CacheGateway {
    pub fn new(store: Arc<dyn ResponseStore>) -> Self {
        Self {
            store: Some(store),
            ttl: DEFAULT_TTL,
        }
    }

    /// Gateway that never caches.
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Return the cached response for `params`, or run `fetch` and cache its result.
    ///
    /// Only successful fetches are stored. Store failures propagate as
    /// `AquiferError::Cache`; an entry that cannot be decoded is treated as a miss.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        params: &RequestParams,
        fetch: F,
    ) -> AquiferResult<RawResponse>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AquiferResult<RawResponse>>,
    {
        let Some(store) = &self.store else {
            return fetch().await;
        };

        let key = cache_key(params)?;

        if let Some(bytes) = store.get(&key).await? {
            match serde_json::from_slice::<RawResponse>(&bytes) {
                Ok(response) => {
                    counter!("aquifer_cache_hits_total").increment(1);
                    debug!(cache_key = %key, backend = store.backend(), "Cache hit");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(cache_key = %key, error = %e, "Discarding undecodable cache entry");
                }
            }
        }

        counter!("aquifer_cache_misses_total").increment(1);
        debug!(cache_key = %key, backend = store.backend(), "Cache miss");

        let response = fetch().await?;

        if response.is_success() {
            let payload = Bytes::from(serde_json::to_vec(&response)?);
            store.set_ex(&key, payload, self.ttl).await?;
            counter!("aquifer_cache_stores_total").increment(1);
            info!(
                cache_key = %key,
                ttl_secs = self.ttl.as_secs(),
                "Cached upstream response"
            );
        }

        Ok(response)
    }
}
