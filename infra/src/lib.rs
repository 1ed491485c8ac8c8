//! # Infrastructure Layer
//!
//! Concrete implementations of the core's storage seams. Today that is the
//! Redis client and the revocation store built on it, which lets every node
//! behind a load balancer see the same revocations.

use hearth_core::errors::DomainError;

/// Cache module - Redis client and the shared revocation store
pub mod cache;

pub use cache::{RedisClient, RedisRevocationStore};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Internal {
            message: err.to_string(),
        }
    }
}
