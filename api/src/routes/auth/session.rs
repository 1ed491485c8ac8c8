use actix_web::HttpResponse;

use crate::dto::SessionResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/session
///
/// Returns the identity behind the presented access token.
pub async fn current_session(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(SessionResponse::from(auth.identity()))
}
