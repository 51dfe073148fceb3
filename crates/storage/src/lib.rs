//! Response caching for the aquifer depth-profile pipeline.
//!
//! Provides:
//! - The `ResponseStore` abstraction over a TTL key-value store
//! - Redis and in-memory LRU implementations
//! - `CacheGateway`, which derives content-addressed keys and short-circuits
//!   upstream fetches on hit

pub mod cache;
pub mod gateway;
pub mod memory_cache;
pub mod store;

pub use cache::RedisResponseStore;
pub use gateway::{cache_key, CacheGateway, DEFAULT_TTL};
pub use memory_cache::{MemoryCacheStats, MemoryResponseStore};
pub use store::ResponseStore;
