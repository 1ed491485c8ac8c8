//! Revocation store trait defining the interface for revoked-token bookkeeping.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Store of token strings that must be rejected before their natural expiry.
///
/// The trait is the swap point between a process-local store and a store
/// shared by every node. It exposes exactly the operations the token core
/// needs: insert, lookup, delete, and a snapshot for sweeping.
///
/// Implementations must be safe to call from many request tasks at once:
/// lookups may run concurrently with each other, inserts and deletes must be
/// exclusive with everything else.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Mark a token string as revoked
    ///
    /// # Arguments
    /// * `token` - The exact token string presented by clients
    /// * `expires_at` - The token's own expiry, when it could be read. Stores
    ///   that expire entries by themselves use it as the TTL; others ignore it.
    ///
    /// # Returns
    /// * `Ok(true)` - The token was not revoked before this call
    /// * `Ok(false)` - The token was already revoked
    /// * `Err(DomainError)` - The store could not be reached
    async fn insert(&self, token: &str, expires_at: Option<DateTime<Utc>>) -> Result<bool, DomainError>;

    /// Check whether a token string has been revoked
    async fn contains(&self, token: &str) -> Result<bool, DomainError>;

    /// Forget a revoked token
    ///
    /// # Returns
    /// * `Ok(true)` - An entry was removed
    /// * `Ok(false)` - No entry existed
    async fn remove(&self, token: &str) -> Result<bool, DomainError>;

    /// Snapshot of every revoked token string, for the cleanup sweeper
    async fn tokens(&self) -> Result<Vec<String>, DomainError>;

    /// Whether entries disappear on their own once the token expires.
    ///
    /// The cleanup sweeper skips stores that return `true`.
    fn is_self_expiring(&self) -> bool {
        false
    }
}
