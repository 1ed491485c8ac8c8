//! Token error taxonomy
//!
//! Every variant except `TokenGenerationFailed` is a terminal rejection of one
//! presented token: retrying the same string can never succeed, the caller has
//! to obtain a fresh token through login or rotation.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("Signature mismatch")]
    SignatureMismatch,

    #[error("Token expired")]
    Expired,

    #[error("Token not yet valid")]
    NotYetValid,

    #[error("Token revoked")]
    Revoked,

    #[error("Invalid token claims")]
    InvalidClaims,

    #[error("Invalid authorization header")]
    InvalidHeader,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Whether the error rejects a presented credential, as opposed to a
    /// failure on the issuing side.
    pub fn is_credential_failure(&self) -> bool {
        !matches!(self, TokenError::TokenGenerationFailed)
    }
}
