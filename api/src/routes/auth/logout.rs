use actix_web::{web, HttpResponse};

use hearth_core::errors::{DomainError, TokenError};
use hearth_core::{RevocationStore, TokenService};

use crate::dto::{LogoutRequest, LogoutResponse};
use crate::handlers::ApiError;
use crate::middleware::auth::AuthContext;
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Revokes the access token the request was authenticated with, and the
/// refresh token when one is given in the body. The refresh token must belong
/// to the caller; an expired or already revoked one is skipped.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "Logged out successfully"
/// }
/// ```
///
/// ## Error (401 Unauthorized)
/// The refresh token is invalid or was issued to someone else. Nothing is
/// revoked.
pub async fn logout<S: RevocationStore + 'static>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
    request: Option<web::Json<LogoutRequest>>,
) -> Result<HttpResponse, ApiError> {
    let refresh_token = match request.and_then(|body| body.into_inner().refresh_token) {
        Some(token) => owned_refresh_token(&state.token_service, &auth, token).await?,
        None => None,
    };

    state.token_service.revoke(&auth.token).await?;

    if let Some(refresh_token) = refresh_token {
        state.token_service.revoke_refresh(&refresh_token).await?;
    }

    log::info!("User {} logged out", auth.user_id);

    Ok(HttpResponse::Ok().json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

/// Returns the refresh token if it still needs revoking on behalf of `auth`
async fn owned_refresh_token<S: RevocationStore>(
    token_service: &TokenService<S>,
    auth: &AuthContext,
    token: String,
) -> Result<Option<String>, ApiError> {
    match token_service.validate_refresh_token(&token).await {
        Ok(claims) if claims.user_id == auth.user_id => Ok(Some(token)),
        Ok(claims) => {
            log::warn!(
                "User {} tried to revoke a refresh token issued to {}",
                auth.user_id,
                claims.user_id
            );
            Err(ApiError::Unauthorized)
        }
        Err(DomainError::Token(TokenError::Expired | TokenError::Revoked)) => Ok(None),
        Err(e) => Err(ApiError::from_credential_check(e)),
    }
}
