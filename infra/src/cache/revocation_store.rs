//! Redis-backed revocation store shared by every node

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use hearth_core::errors::DomainError;
use hearth_core::repositories::RevocationStore;
use hearth_shared::config::{CacheConfig, RevocationConfig};

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// Revocation store kept in Redis.
///
/// Each revoked token becomes one key, named by the SHA-256 of the token so
/// raw credentials never sit in Redis. The key expires when the token does,
/// which makes the store self-cleaning: the sweeper leaves it alone and
/// [`RevocationStore::tokens`] has nothing to report.
#[derive(Clone)]
pub struct RedisRevocationStore {
    client: RedisClient,
    key_prefix: String,
    /// TTL for tokens whose expiry could not be read
    default_ttl: u64,
}

impl RedisRevocationStore {
    pub fn new(client: RedisClient, key_prefix: impl Into<String>, default_ttl: u64) -> Self {
        Self {
            client,
            key_prefix: key_prefix.into(),
            default_ttl,
        }
    }

    /// Connect to Redis and build the store from configuration
    pub async fn connect(
        cache: &CacheConfig,
        revocation: &RevocationConfig,
    ) -> Result<Self, InfrastructureError> {
        let client = RedisClient::new(cache.clone()).await?;
        Ok(Self::new(client, revocation.key_prefix.clone(), cache.default_ttl))
    }

    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn key_for(&self, token: &str) -> String {
        revocation_key(&self.key_prefix, token)
    }
}

/// Redis key for a revoked token
pub(crate) fn revocation_key(prefix: &str, token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{}{:x}", prefix, hasher.finalize())
}

/// Seconds the entry must live: until the token expires, never less than one
/// second so a just-revoked token reads as revoked
pub(crate) fn ttl_seconds(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>, default_ttl: u64) -> u64 {
    match expires_at {
        Some(expires_at) => (expires_at - now).num_seconds().max(1) as u64,
        None => default_ttl.max(1),
    }
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn insert(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<bool, DomainError> {
        let ttl = ttl_seconds(expires_at, Utc::now(), self.default_ttl);
        let created = self
            .client
            .set_if_absent_with_expiry(&self.key_for(token), "1", ttl)
            .await?;
        debug!(ttl, created, "Recorded revocation in Redis");
        Ok(created)
    }

    async fn contains(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.client.exists(&self.key_for(token)).await?)
    }

    async fn remove(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.client.delete(&self.key_for(token)).await?)
    }

    /// Keys are hashes, so the original strings cannot be listed
    async fn tokens(&self) -> Result<Vec<String>, DomainError> {
        Ok(Vec::new())
    }

    fn is_self_expiring(&self) -> bool {
        true
    }
}
