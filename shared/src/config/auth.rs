//! Authentication token configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing and lifetime configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// Issuer claim written into and required on every token
    pub issuer: String,

    /// HMAC algorithm name (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// Clock skew tolerated by signature-level expiry checks, in seconds
    #[serde(default = "default_leeway")]
    pub leeway: u64,

    /// Whether a refresh token stays valid after rotation ("reusable" or "single_use")
    #[serde(default = "default_refresh_policy")]
    pub refresh_policy: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("issuer", &self.issuer)
            .field("algorithm", &self.algorithm)
            .field("leeway", &self.leeway)
            .field("refresh_policy", &self.refresh_policy)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 900,      // 15 minutes
            refresh_token_expiry: 604800,  // 7 days
            issuer: String::from("hearth"),
            algorithm: default_algorithm(),
            leeway: default_leeway(),
            refresh_policy: default_refresh_policy(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            leeway: env_or("JWT_LEEWAY", defaults.leeway),
            refresh_policy: std::env::var("JWT_REFRESH_POLICY").unwrap_or(defaults.refresh_policy),
        }
    }
}

/// Where revoked tokens are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationBackend {
    /// Process-local map, swept periodically
    Memory,
    /// Redis keys that expire with the token
    Redis,
}

impl std::str::FromStr for RevocationBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(RevocationBackend::Memory),
            "redis" => Ok(RevocationBackend::Redis),
            _ => Err(format!("Invalid revocation backend: {}", s)),
        }
    }
}

/// Revocation store and sweeper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RevocationConfig {
    /// Store implementation
    pub backend: RevocationBackend,

    /// Seconds between cleanup sweeps of the in-memory store
    pub cleanup_interval: u64,

    /// Whether the cleanup sweeper runs at all
    #[serde(default = "default_cleanup_enabled")]
    pub cleanup_enabled: bool,

    /// Redis key prefix for revoked tokens
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RevocationConfig {
    fn default() -> Self {
        Self {
            backend: RevocationBackend::Memory,
            cleanup_interval: 300,  // 5 minutes
            cleanup_enabled: default_cleanup_enabled(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl RevocationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env_or("REVOCATION_BACKEND", defaults.backend),
            cleanup_interval: env_or("TOKEN_CLEANUP_INTERVAL", defaults.cleanup_interval),
            cleanup_enabled: env_or("TOKEN_CLEANUP_ENABLED", defaults.cleanup_enabled),
            key_prefix: std::env::var("REVOCATION_KEY_PREFIX").unwrap_or(defaults.key_prefix),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Revocation configuration
    #[serde(default)]
    pub revocation: RevocationConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt: JwtConfig::from_env(),
            revocation: RevocationConfig::from_env(),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_leeway() -> u64 {
    60
}

fn default_refresh_policy() -> String {
    String::from("reusable")
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_key_prefix() -> String {
    String::from("hearth:revoked:")
}
