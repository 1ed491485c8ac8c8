//! Cache module for Redis-based storage
//!
//! Connection handling and retry logic live in the client; the revocation
//! store maps the core's store operations onto Redis keys with TTLs.

pub mod redis_client;
pub mod revocation_store;


pub use redis_client::RedisClient;
pub use revocation_store::RedisRevocationStore;

// Re-export commonly used types
pub use hearth_shared::config::CacheConfig;
