//! Integration tests for the Redis revocation store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p hearth_infra --test redis_revocation_integration -- --ignored

use std::sync::Arc;

use chrono::{Duration, Utc};
use hearth_core::repositories::RevocationStore;
use hearth_core::services::token::{
    TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig,
};
use hearth_core::{DomainError, Role, TokenError};
use hearth_infra::cache::{CacheConfig, RedisRevocationStore};
use hearth_shared::config::RevocationConfig;
use uuid::Uuid;

async fn connect() -> RedisRevocationStore {
    let cache = CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    );
    let revocation = RevocationConfig {
        key_prefix: "test:hearth:revoked:".to_string(),
        ..Default::default()
    };
    RedisRevocationStore::connect(&cache, &revocation).await.unwrap()
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_insert_contains_remove() {
    let store = connect().await;
    let token = format!("integration-{}", Uuid::new_v4());

    assert!(store.insert(&token, Some(Utc::now() + Duration::minutes(5))).await.unwrap());
    assert!(!store.insert(&token, Some(Utc::now() + Duration::minutes(5))).await.unwrap());
    assert!(store.contains(&token).await.unwrap());

    assert!(store.remove(&token).await.unwrap());
    assert!(!store.contains(&token).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_entry_expires_with_token() {
    let store = connect().await;
    let token = format!("integration-{}", Uuid::new_v4());

    store.insert(&token, Some(Utc::now() + Duration::seconds(1))).await.unwrap();
    assert!(store.contains(&token).await.unwrap());

    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    assert!(!store.contains(&token).await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_token_service_over_redis() {
    let store = Arc::new(connect().await);
    let service = TokenService::new(Arc::clone(&store), TokenServiceConfig::new("redis-integration")).unwrap();
    let pair = service
        .issue_token_pair(Uuid::new_v4(), "owner@hearth.test", Role::Owner, None)
        .unwrap();

    service.revoke(&pair.access_token).await.unwrap();

    // A second service instance sharing the store sees the revocation
    let other_node = TokenService::new(Arc::clone(&store), TokenServiceConfig::new("redis-integration")).unwrap();
    assert!(matches!(
        other_node.validate_access_token(&pair.access_token).await,
        Err(DomainError::Token(TokenError::Revoked))
    ));

    // The sweeper leaves a self-expiring store alone
    let cleanup = TokenCleanupService::for_service(&service, TokenCleanupConfig::default());
    assert_eq!(cleanup.run_cleanup().await.unwrap().entries_scanned, 0);
}
