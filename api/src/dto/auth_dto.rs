use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use hearth_core::{IdentityInfo, Role};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
    /// The session's most recent access token, expired or not
    #[validate(length(min = 1))]
    pub access_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub agency_id: Option<Uuid>,
}

impl From<IdentityInfo> for SessionResponse {
    fn from(identity: IdentityInfo) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role,
            agency_id: identity.agency_id,
        }
    }
}
