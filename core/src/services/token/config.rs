//! Configuration for the token service

use chrono::Duration;
use hearth_shared::config::JwtConfig;
use jsonwebtoken::Algorithm;

use crate::errors::{DomainError, DomainResult};

/// Longest lifetime accepted for either token
pub const MAX_TOKEN_LIFETIME_DAYS: i64 = 3650;

/// What happens to a refresh token once it has been exchanged for a new pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// The refresh token stays valid until it expires or is revoked
    #[default]
    Reusable,
    /// The refresh token is revoked by the rotation that consumes it
    SingleUse,
}

impl std::str::FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "reusable" => Ok(RefreshPolicy::Reusable),
            "single_use" | "rotating" => Ok(RefreshPolicy::SingleUse),
            _ => Err(format!("Invalid refresh policy: {}", s)),
        }
    }
}

/// Configuration for the token service, fixed at construction
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// Shared signing secret
    pub secret: Vec<u8>,
    /// HMAC signing algorithm
    pub algorithm: Algorithm,
    pub access_token_ttl: Duration,
    pub refresh_token_ttl: Duration,
    /// Issuer written into and required on every token
    pub issuer: String,
    /// Clock skew tolerated by the signature-level expiry check, in seconds
    pub leeway_seconds: u64,
    pub refresh_policy: RefreshPolicy,
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("issuer", &self.issuer)
            .field("leeway_seconds", &self.leeway_seconds)
            .field("refresh_policy", &self.refresh_policy)
            .finish()
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            secret: b"development-secret-please-change-in-production".to_vec(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
            issuer: "hearth".to_string(),
            leeway_seconds: 60,
            refresh_policy: RefreshPolicy::Reusable,
        }
    }
}

impl TokenServiceConfig {
    /// Create a configuration with the given secret and default lifetimes
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_lifetimes(mut self, access: Duration, refresh: Duration) -> Self {
        self.access_token_ttl = access;
        self.refresh_token_ttl = refresh;
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    /// Build from the shared JWT configuration
    pub fn from_jwt_config(jwt: &JwtConfig) -> DomainResult<Self> {
        let algorithm = parse_hmac_algorithm(&jwt.algorithm)?;
        let refresh_policy = jwt
            .refresh_policy
            .parse()
            .map_err(|message| DomainError::Validation { message })?;

        let config = Self {
            secret: jwt.secret.as_bytes().to_vec(),
            algorithm,
            access_token_ttl: lifetime("JWT_ACCESS_TOKEN_EXPIRY", jwt.access_token_expiry)?,
            refresh_token_ttl: lifetime("JWT_REFRESH_TOKEN_EXPIRY", jwt.refresh_token_expiry)?,
            issuer: jwt.issuer.clone(),
            leeway_seconds: jwt.leeway,
            refresh_policy,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the construction-time invariants
    pub fn validate(&self) -> DomainResult<()> {
        if self.secret.is_empty() {
            return Err(DomainError::Validation {
                message: "Signing secret must not be empty".to_string(),
            });
        }
        if !matches!(self.algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(DomainError::Validation {
                message: format!("Unsupported signing algorithm: {:?}", self.algorithm),
            });
        }
        if self.access_token_ttl < Duration::zero() {
            return Err(DomainError::Validation {
                message: "Access token lifetime must not be negative".to_string(),
            });
        }
        if self.refresh_token_ttl > Duration::days(MAX_TOKEN_LIFETIME_DAYS) {
            return Err(DomainError::Validation {
                message: format!(
                    "Refresh token lifetime must not exceed {} days",
                    MAX_TOKEN_LIFETIME_DAYS
                ),
            });
        }
        if self.access_token_ttl > self.refresh_token_ttl {
            return Err(DomainError::Validation {
                message: "Access token lifetime must not exceed refresh token lifetime".to_string(),
            });
        }
        if self.issuer.is_empty() {
            return Err(DomainError::Validation {
                message: "Issuer must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn lifetime(name: &str, seconds: i64) -> DomainResult<Duration> {
    Duration::try_seconds(seconds).ok_or_else(|| DomainError::Validation {
        message: format!("{} is out of range: {}", name, seconds),
    })
}

fn parse_hmac_algorithm(name: &str) -> DomainResult<Algorithm> {
    match name.to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(DomainError::Validation {
            message: format!("Unsupported signing algorithm: {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TokenServiceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_access_must_not_outlive_refresh() {
        let config = TokenServiceConfig::new("secret")
            .with_lifetimes(Duration::days(2), Duration::days(1));
        assert!(matches!(config.validate(), Err(DomainError::Validation { .. })));
    }

    #[test]
    fn test_zero_access_lifetime_is_allowed() {
        let config = TokenServiceConfig::new("secret")
            .with_lifetimes(Duration::zero(), Duration::days(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_lifetime_upper_bound() {
        let config = TokenServiceConfig::new("secret")
            .with_lifetimes(Duration::minutes(15), Duration::days(MAX_TOKEN_LIFETIME_DAYS));
        assert!(config.validate().is_ok());

        let config = TokenServiceConfig::new("secret")
            .with_lifetimes(Duration::minutes(15), Duration::days(1_000_000_000));
        assert!(matches!(config.validate(), Err(DomainError::Validation { .. })));

        // Access lifetime is bounded through the refresh lifetime
        let config = TokenServiceConfig::new("secret")
            .with_lifetimes(Duration::days(1_000_000_000), Duration::days(7));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_jwt_config_rejects_unrepresentable_expiry() {
        let mut jwt = JwtConfig::new("from-env-secret");
        jwt.refresh_token_expiry = i64::MAX;
        assert!(matches!(
            TokenServiceConfig::from_jwt_config(&jwt),
            Err(DomainError::Validation { .. })
        ));

        let mut jwt = JwtConfig::new("from-env-secret");
        jwt.refresh_token_expiry = 3650 * 24 * 3600 + 1;
        assert!(TokenServiceConfig::from_jwt_config(&jwt).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let config = TokenServiceConfig::new(Vec::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let mut config = TokenServiceConfig::default();
        config.algorithm = Algorithm::RS256;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_jwt_config() {
        let mut jwt = JwtConfig::new("from-env-secret");
        jwt.algorithm = "hs512".to_string();
        jwt.refresh_policy = "single-use".to_string();

        let config = TokenServiceConfig::from_jwt_config(&jwt).unwrap();
        assert_eq!(config.algorithm, Algorithm::HS512);
        assert_eq!(config.refresh_policy, RefreshPolicy::SingleUse);
        assert_eq!(config.access_token_ttl, Duration::seconds(900));
        assert_eq!(config.secret, b"from-env-secret".to_vec());
    }

    #[test]
    fn test_from_jwt_config_rejects_unknown_algorithm() {
        let mut jwt = JwtConfig::default();
        jwt.algorithm = "none".to_string();
        assert!(TokenServiceConfig::from_jwt_config(&jwt).is_err());

        jwt.algorithm = "RS256".to_string();
        assert!(TokenServiceConfig::from_jwt_config(&jwt).is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = TokenServiceConfig::new("do-not-print");
        assert!(!format!("{:?}", config).contains("do-not-print"));
    }
}
