//! Process-local revocation store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::RevocationStore;

/// Revocation store held in process memory.
///
/// Suitable for a single node. Entries stay until the cleanup sweeper removes
/// them, which it does by reading the expiry back out of each token. Clones
/// share the same underlying map.
#[derive(Clone, Default)]
pub struct InMemoryRevocationStore {
    revoked: Arc<RwLock<HashMap<String, ()>>>,
}

impl InMemoryRevocationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of revoked tokens currently held
    pub async fn len(&self) -> usize {
        self.revoked.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.revoked.read().await.is_empty()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationStore {
    async fn insert(&self, token: &str, _expires_at: Option<DateTime<Utc>>) -> Result<bool, DomainError> {
        let mut revoked = self.revoked.write().await;
        Ok(revoked.insert(token.to_string(), ()).is_none())
    }

    async fn contains(&self, token: &str) -> Result<bool, DomainError> {
        let revoked = self.revoked.read().await;
        Ok(revoked.contains_key(token))
    }

    async fn remove(&self, token: &str) -> Result<bool, DomainError> {
        let mut revoked = self.revoked.write().await;
        Ok(revoked.remove(token).is_some())
    }

    async fn tokens(&self) -> Result<Vec<String>, DomainError> {
        let revoked = self.revoked.read().await;
        Ok(revoked.keys().cloned().collect())
    }
}
