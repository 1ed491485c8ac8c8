//! Signing and verification of claim sets

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainResult, TokenError};

use super::config::TokenServiceConfig;

/// Signs and verifies claim sets with one shared secret and one HMAC algorithm.
///
/// Verification only accepts tokens whose header names the configured
/// algorithm, so a token re-labelled with a different algorithm is rejected
/// before its signature is looked at.
pub struct TokenCodec {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lenient_validation: Validation,
    probe_validation: Validation,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ExpiryProbe {
    exp: i64,
}

impl TokenCodec {
    /// Creates a codec from the service configuration
    pub fn new(config: &TokenServiceConfig) -> DomainResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(&config.secret);
        let decoding_key = DecodingKey::from_secret(&config.secret);

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iat", "iss", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = config.leeway_seconds;

        // Same checks, except that a past `exp` is accepted
        let mut lenient_validation = validation.clone();
        lenient_validation.validate_exp = false;

        // Reads `exp` only: no signature, time or issuer checks
        let mut probe_validation = Validation::new(config.algorithm);
        probe_validation.insecure_disable_signature_validation();
        probe_validation.required_spec_claims.clear();
        probe_validation.validate_exp = false;
        probe_validation.validate_nbf = false;
        probe_validation.validate_aud = false;

        Ok(Self {
            algorithm: config.algorithm,
            encoding_key,
            decoding_key,
            validation,
            lenient_validation,
            probe_validation,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Serializes and signs a claim set
    pub fn sign<C: Serialize>(&self, claims: &C) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            TokenError::TokenGenerationFailed
        })
    }

    /// Verifies signature, algorithm, issuer and time claims, then
    /// deserializes the payload into `C`
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        decode::<C>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| self.classify_failure(token, e.kind()))
    }

    /// Like [`TokenCodec::verify`], but an expired token is still accepted.
    ///
    /// Only for reading who a session belonged to; never grant access on it.
    pub fn verify_allowing_expired<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        decode::<C>(token, &self.decoding_key, &self.lenient_validation)
            .map(|data| data.claims)
            .map_err(|e| self.classify_failure(token, e.kind()))
    }

    /// Reads the expiry timestamp without checking the signature.
    ///
    /// Used to age out revocation entries, where a tampered but parseable
    /// token still carries a usable expiry. Never use the result to trust a
    /// token.
    pub fn peek_expiry(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        let probe = decode::<ExpiryProbe>(token, &self.decoding_key, &self.probe_validation)
            .map_err(|_| TokenError::MalformedToken)?;
        Utc.timestamp_opt(probe.claims.exp, 0)
            .single()
            .ok_or(TokenError::MalformedToken)
    }

    /// Maps a decode failure to a token error.
    ///
    /// Headers naming an algorithm the JWT library has no variant for (`none`
    /// among them) fail as unparseable JSON, so the raw `alg` is read here to
    /// report them as the wrong algorithm rather than as garbage.
    fn classify_failure(&self, token: &str, kind: &ErrorKind) -> TokenError {
        match map_jwt_error(kind) {
            TokenError::MalformedToken => match header_algorithm(token) {
                Some(alg) if alg.parse::<Algorithm>().ok() != Some(self.algorithm) => {
                    tracing::debug!(alg = %alg, "Rejected token signed with unexpected algorithm");
                    TokenError::UnexpectedAlgorithm
                }
                _ => TokenError::MalformedToken,
            },
            other => other,
        }
    }
}

/// Reads the `alg` field of the first segment without interpreting it
fn header_algorithm(token: &str) -> Option<String> {
    let header = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(header).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    value.get("alg")?.as_str().map(str::to_owned)
}

fn map_jwt_error(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::ImmatureSignature => TokenError::NotYetValid,
        ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => TokenError::UnexpectedAlgorithm,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience | ErrorKind::InvalidSubject => {
            TokenError::InvalidClaims
        }
        _ => TokenError::MalformedToken,
    }
}
