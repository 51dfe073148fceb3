//! Key-value store abstraction used by the cache gateway.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use aquifer_common::AquiferResult;

/// A shared key-value store with per-key expiry.
///
/// Implementations must tolerate concurrent readers and writers; a `set_ex`
/// on an existing key replaces its value and TTL (last writer wins).
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> AquiferResult<Option<Bytes>>;

    /// Store `value` under `key` for `ttl`.
    async fn set_ex(&self, key: &str, value: Bytes, ttl: Duration) -> AquiferResult<()>;

    /// Backend name for logs and metrics labels.
    fn backend(&self) -> &'static str;
}
