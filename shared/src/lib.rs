//! Shared configuration types for the Hearth server crates
//!
//! This crate provides the configuration surface used across all server modules:
//! - Token signing and lifetime settings
//! - Revocation store and cleanup settings
//! - Redis, HTTP server and logging settings

pub mod config;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CacheConfig, Environment, JwtConfig, LoggingConfig,
    RevocationBackend, RevocationConfig, ServerConfig,
};
