//! Claim sets signed into access and refresh tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

use super::role::Role;

/// Which half of a token pair a claim set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Identity the token was issued to
    pub user_id: Uuid,

    pub email: String,

    pub role: Role,

    /// Agency (tenant) the identity acts for, if any
    pub agency_id: Option<Uuid>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    pub token_use: TokenUse,
}

impl AccessClaims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The identity's UUID
    /// * `email` - The identity's email
    /// * `role` - The identity's privilege level
    /// * `agency_id` - The agency the identity belongs to, if any
    /// * `issuer` - Issuer label
    /// * `issued_at` - Shared clock reading for the whole token pair
    /// * `ttl` - Lifetime of the token
    ///
    /// Fails with `TokenGenerationFailed` when the expiry is not a
    /// representable instant.
    pub fn new(
        user_id: Uuid,
        email: impl Into<String>,
        role: Role,
        agency_id: Option<Uuid>,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let iat = issued_at.timestamp();
        Ok(Self {
            sub: user_id.to_string(),
            user_id,
            email: email.into(),
            role,
            agency_id,
            iat,
            exp: expiry(issued_at, ttl)?,
            nbf: iat,
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
            token_use: TokenUse::Access,
        })
    }

    /// `true` once `now` has reached the expiry timestamp
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the subject names the same identity as `user_id`
    pub fn subject_matches(&self) -> bool {
        self.sub == self.user_id.to_string()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// Projection handed to boundary code
    pub fn identity(&self) -> IdentityInfo {
        IdentityInfo {
            user_id: self.user_id,
            email: self.email.clone(),
            role: self.role,
            agency_id: self.agency_id,
        }
    }
}

/// Claims structure for the refresh token payload.
///
/// Carries no role or agency so privilege information never travels on the
/// long-lived credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub user_id: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub jti: String,
    pub token_use: TokenUse,
}

impl RefreshClaims {
    /// Creates new claims for a refresh token
    pub fn new(
        user_id: Uuid,
        issuer: impl Into<String>,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let iat = issued_at.timestamp();
        Ok(Self {
            sub: user_id.to_string(),
            user_id,
            iat,
            exp: expiry(issued_at, ttl)?,
            nbf: iat,
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
            token_use: TokenUse::Refresh,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn subject_matches(&self) -> bool {
        self.sub == self.user_id.to_string()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

fn expiry(issued_at: DateTime<Utc>, ttl: Duration) -> Result<i64, TokenError> {
    issued_at
        .checked_add_signed(ttl)
        .map(|exp| exp.timestamp())
        .ok_or(TokenError::TokenGenerationFailed)
}

/// Identity attached to a request once its access token validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityInfo {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub agency_id: Option<Uuid>,
}
