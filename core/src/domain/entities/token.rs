//! Token pair handed back to callers after issuance or rotation.

use serde::{Deserialize, Serialize};

/// Literal `token_type` of every pair, matching the `Authorization` scheme
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Seconds until the access token expires
    pub expires_in: i64,

    /// Always `"Bearer"`
    pub token_type: String,
}

impl TokenPair {
    /// Creates a new token pair
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}
