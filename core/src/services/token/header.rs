//! `Authorization` header parsing

use crate::domain::entities::TOKEN_TYPE_BEARER;
use crate::errors::TokenError;

/// Extracts the token from an `Authorization: Bearer <token>` header value.
///
/// The value must split on a single space into exactly two parts, the first
/// being exactly `Bearer` and the second non-empty. Anything else, including
/// a lowercase scheme or extra whitespace, is `InvalidHeader`.
pub fn extract_token_from_header(header_value: &str) -> Result<&str, TokenError> {
    let mut parts = header_value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme == TOKEN_TYPE_BEARER && !token.is_empty() => Ok(token),
        _ => Err(TokenError::InvalidHeader),
    }
}
