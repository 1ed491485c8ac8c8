use actix_web::{web, HttpResponse};

use hearth_core::RevocationStore;

use crate::handlers::ApiError;
use crate::middleware::auth::AuthContext;
use crate::routes::AppState;

/// Handler for POST /api/v1/admin/revocations/cleanup
///
/// Runs one revocation sweep now instead of waiting for the next interval and
/// returns its counts.
pub async fn run_cleanup<S: RevocationStore + 'static>(
    state: web::Data<AppState<S>>,
    auth: AuthContext,
) -> Result<HttpResponse, ApiError> {
    log::info!("Manual revocation sweep requested by {}", auth.user_id);

    let result = state.cleanup_service.run_cleanup().await?;

    Ok(HttpResponse::Ok().json(result))
}
