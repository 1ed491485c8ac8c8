use actix_web::{web, HttpResponse};
use validator::Validate;

use hearth_core::RevocationStore;

use crate::dto::RefreshTokenRequest;
use crate::handlers::ApiError;
use crate::routes::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The identity carried into
/// the new pair is read from the session's last access token.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ...",
///     "access_token": "eyJ..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "expires_in": 900,
///     "token_type": "Bearer"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing fields
/// - 401 Unauthorized: Any rejected token
/// - 500 Internal Server Error: Token generation failure
pub async fn refresh_token<S: RevocationStore + 'static>(
    state: web::Data<AppState<S>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, ApiError> {
    request.validate()?;

    let pair = state
        .token_service
        .rotate_session(&request.refresh_token, &request.access_token)
        .await
        .map_err(ApiError::from_credential_check)?;

    Ok(HttpResponse::Ok().json(pair))
}
