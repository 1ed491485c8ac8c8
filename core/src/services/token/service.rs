//! Main token service implementation

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::{AccessClaims, IdentityInfo, RefreshClaims, Role, TokenPair, TokenUse};
use crate::errors::{DomainResult, TokenError};
use crate::repositories::RevocationStore;

use super::codec::TokenCodec;
use super::config::{RefreshPolicy, TokenServiceConfig};

/// Issues, validates, rotates and revokes session tokens.
///
/// All state is passed in at construction: the signing configuration and the
/// revocation store. The service holds no process-wide singletons; key
/// rotation means building a new instance (see [`TokenService::with_signing_config`])
/// and swapping the `Arc` callers hold.
pub struct TokenService<S: RevocationStore> {
    store: Arc<S>,
    codec: Arc<TokenCodec>,
    config: TokenServiceConfig,
}

impl<S: RevocationStore> TokenService<S> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `store` - Revocation store consulted on every validation
    /// * `config` - Signing secret, algorithm, lifetimes, issuer and refresh policy
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or a validation error if the configuration breaks
    /// an invariant (empty secret, non-HMAC algorithm, access lifetime longer
    /// than refresh lifetime)
    pub fn new(store: Arc<S>, config: TokenServiceConfig) -> DomainResult<Self> {
        let codec = TokenCodec::new(&config)?;
        info!(
            algorithm = ?config.algorithm,
            access_ttl_secs = config.access_token_ttl.num_seconds(),
            refresh_ttl_secs = config.refresh_token_ttl.num_seconds(),
            refresh_policy = ?config.refresh_policy,
            "Token service initialized"
        );
        Ok(Self {
            store,
            codec: Arc::new(codec),
            config,
        })
    }

    /// Builds a new service with a different signing configuration that keeps
    /// using this service's revocation store.
    ///
    /// Tokens signed under the old secret stop validating on the new instance.
    pub fn with_signing_config(&self, config: TokenServiceConfig) -> DomainResult<Self> {
        Self::new(Arc::clone(&self.store), config)
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    pub fn codec(&self) -> Arc<TokenCodec> {
        Arc::clone(&self.codec)
    }

    pub fn store(&self) -> Arc<S> {
        Arc::clone(&self.store)
    }

    /// Issues an access/refresh token pair for an authenticated identity
    ///
    /// Both claim sets share one clock reading, so the pair always agrees on
    /// subject and issued-at.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Signed tokens plus seconds until access expiry
    /// * `Err(DomainError)` - Signing failed; this points at a misconfigured
    ///   environment, not at the caller
    pub fn issue_token_pair(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        agency_id: Option<Uuid>,
    ) -> DomainResult<TokenPair> {
        let now = Utc::now();
        let access_claims = AccessClaims::new(
            user_id,
            email,
            role,
            agency_id,
            self.config.issuer.as_str(),
            now,
            self.config.access_token_ttl,
        )?;
        let refresh_claims = RefreshClaims::new(
            user_id,
            self.config.issuer.as_str(),
            now,
            self.config.refresh_token_ttl,
        )?;

        let access_token = self.codec.sign(&access_claims)?;
        let refresh_token = self.codec.sign(&refresh_claims)?;

        debug!(%user_id, %role, "Issued token pair");

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.config.access_token_ttl.num_seconds(),
        ))
    }

    /// Validates an access token and returns its claims
    ///
    /// The revocation store is consulted before the token is decoded, so a
    /// revoked string is rejected whatever its signature says. After the
    /// codec accepts the token, expiry is checked again without leeway.
    ///
    /// # Returns
    ///
    /// * `Ok(AccessClaims)` - The token is valid
    /// * `Err(TokenError::Revoked)` - The exact string has been revoked
    /// * `Err(TokenError::Expired)` - The token is past its expiry
    /// * `Err(TokenError::InvalidClaims)` - The token is not an access token
    /// * `Err(..)` - Any codec rejection, or the store could not be read
    pub async fn validate_access_token(&self, token: &str) -> DomainResult<AccessClaims> {
        self.ensure_not_revoked(token).await?;

        let claims: AccessClaims = self.decode_claims(token, TokenUse::Access, false)?;
        if !claims.subject_matches() {
            return Err(TokenError::InvalidClaims.into());
        }
        if claims.is_expired_at(Utc::now()) {
            return Err(TokenError::Expired.into());
        }

        Ok(claims)
    }

    /// Validates a refresh token and returns its claims
    pub async fn validate_refresh_token(&self, token: &str) -> DomainResult<RefreshClaims> {
        self.ensure_not_revoked(token).await?;

        let claims: RefreshClaims = self.decode_claims(token, TokenUse::Refresh, false)?;
        if !claims.subject_matches() {
            return Err(TokenError::InvalidClaims.into());
        }
        if claims.is_expired_at(Utc::now()) {
            return Err(TokenError::Expired.into());
        }

        Ok(claims)
    }

    /// Exchanges a refresh token for a new token pair
    ///
    /// The new pair is bound to the refresh token's identity; `email`, `role`
    /// and `agency_id` come from the caller's current view of that identity.
    /// Nothing is issued when the refresh token is rejected.
    ///
    /// Under [`RefreshPolicy::Reusable`] the old refresh token stays valid.
    /// Under [`RefreshPolicy::SingleUse`] it is revoked before the new pair is
    /// signed; of two concurrent rotations with the same token only the one
    /// that revokes it first succeeds.
    pub async fn rotate_access_token(
        &self,
        refresh_token: &str,
        email: &str,
        role: Role,
        agency_id: Option<Uuid>,
    ) -> DomainResult<TokenPair> {
        let refresh_claims = self.validate_refresh_token(refresh_token).await?;

        if self.config.refresh_policy == RefreshPolicy::SingleUse {
            let consumed = self
                .store
                .insert(refresh_token, refresh_claims.expires_at())
                .await?;
            if !consumed {
                warn!(user_id = %refresh_claims.user_id, "Refresh token reused after rotation");
                return Err(TokenError::Revoked.into());
            }
        }

        let pair = self
            .issue_token_pair(refresh_claims.user_id, email, role, agency_id)
            .map_err(|e| {
                error!(user_id = %refresh_claims.user_id, "Token rotation failed: {}", e);
                e
            })?;

        info!(
            user_id = %refresh_claims.user_id,
            policy = ?self.config.refresh_policy,
            "Rotated token pair"
        );
        Ok(pair)
    }

    /// Exchanges a refresh token for a new pair when the caller has no
    /// directory to look the identity up in.
    ///
    /// Email, role and tenant are carried over from the session's last access
    /// token, which may have expired but must be correctly signed, not revoked,
    /// and belong to the same user as the refresh token. A role change since
    /// that token was issued is not picked up here.
    pub async fn rotate_session(
        &self,
        refresh_token: &str,
        previous_access_token: &str,
    ) -> DomainResult<TokenPair> {
        self.ensure_not_revoked(previous_access_token).await?;
        let previous: AccessClaims =
            self.decode_claims(previous_access_token, TokenUse::Access, true)?;

        let refresh_claims = self.validate_refresh_token(refresh_token).await?;
        if !previous.subject_matches() || previous.user_id != refresh_claims.user_id {
            warn!(user_id = %refresh_claims.user_id, "Session rotation with mismatched tokens");
            return Err(TokenError::InvalidClaims.into());
        }

        self.rotate_access_token(refresh_token, &previous.email, previous.role, previous.agency_id)
            .await
    }

    /// Revokes an access token. Idempotent.
    pub async fn revoke(&self, token: &str) -> DomainResult<()> {
        self.revoke_token(token, TokenUse::Access).await
    }

    /// Revokes a refresh token. Idempotent.
    pub async fn revoke_refresh(&self, token: &str) -> DomainResult<()> {
        self.revoke_token(token, TokenUse::Refresh).await
    }

    /// Whether the exact token string has been revoked
    pub async fn is_revoked(&self, token: &str) -> DomainResult<bool> {
        self.store.contains(token).await
    }

    /// Non-failing lookup for gate checks.
    ///
    /// Collapses every rejection (revoked, expired, malformed, store failure)
    /// into `None`. Callers that need to tell failures apart, or that guard
    /// anything beyond a low-stakes allow/deny decision, should call
    /// [`TokenService::validate_access_token`] instead.
    pub async fn parse_identity_info(&self, token: &str) -> Option<IdentityInfo> {
        self.validate_access_token(token)
            .await
            .ok()
            .map(|claims| claims.identity())
    }

    async fn ensure_not_revoked(&self, token: &str) -> DomainResult<()> {
        if self.store.contains(token).await? {
            return Err(TokenError::Revoked.into());
        }
        Ok(())
    }

    /// Verifies the token, then checks it is of the expected kind before
    /// reading it into the typed claim set
    fn decode_claims<C: DeserializeOwned>(
        &self,
        token: &str,
        expected: TokenUse,
        allow_expired: bool,
    ) -> Result<C, TokenError> {
        let payload: serde_json::Value = if allow_expired {
            self.codec.verify_allowing_expired(token)?
        } else {
            self.codec.verify(token)?
        };
        let token_use = payload
            .get("token_use")
            .and_then(|value| serde_json::from_value::<TokenUse>(value.clone()).ok());
        if token_use != Some(expected) {
            return Err(TokenError::InvalidClaims);
        }
        serde_json::from_value(payload).map_err(|_| TokenError::InvalidClaims)
    }

    async fn revoke_token(&self, token: &str, token_use: TokenUse) -> DomainResult<()> {
        // The store may use the expiry as a TTL; unparseable tokens are still
        // recorded and later dropped by the sweeper.
        let expires_at: Option<DateTime<Utc>> = self.codec.peek_expiry(token).ok();
        let newly_revoked = self.store.insert(token, expires_at).await?;
        debug!(?token_use, newly_revoked, "Token revoked");
        Ok(())
    }
}
