//! Redis-backed response store.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};
use std::time::Duration;
use tracing::info;

use aquifer_common::{AquiferError, AquiferResult};

use crate::store::ResponseStore;

/// Redis response store client.
///
/// The multiplexed connection is cloned per command, so one store can be
/// shared by any number of concurrent pipelines.
#[derive(Clone)]
pub struct RedisResponseStore {
    conn: MultiplexedConnection,
}

impl RedisResponseStore {
    /// Connect to Redis.
    pub async fn connect(redis_url: &str) -> AquiferResult<Self> {
        let client = Client::open(redis_url)
            .map_err(|e| AquiferError::Cache(format!("Redis connection failed: {}", e)))?;

        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AquiferError::Cache(format!("Redis connection failed: {}", e)))?;

        info!(redis_url = %redacted(redis_url), "Connected to Redis response cache");
        Ok(Self { conn })
    }
}

#[async_trait]
impl ResponseStore for RedisResponseStore {
    async fn get(&self, key: &str) -> AquiferResult<Option<Bytes>> {
        let mut conn = self.conn.clone();

        let result: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| AquiferError::Cache(format!("Cache get failed: {}", e)))?;

        Ok(result.map(Bytes::from))
    }

    async fn set_ex(&self, key: &str, value: Bytes, ttl: Duration) -> AquiferResult<()> {
        let mut conn = self.conn.clone();

        let _: () = conn
            .set_ex(key, value.as_ref(), ttl.as_secs().max(1))
            .await
            .map_err(|e| AquiferError::Cache(format!("Cache set failed: {}", e)))?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

/// Strip credentials from a connection URL before logging it.
fn redacted(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
