//! Route table and application factory

use actix_web::{web, HttpResponse};

use hearth_core::{RevocationStore, Role};

use crate::middleware::{JwtAuth, RequireRole};
use crate::routes::{admin, auth, AppState};

/// Registers every route on an actix `App` or scope.
///
/// `/health` and `/api/v1/auth/refresh` are public; everything else goes
/// through bearer authentication, and `/api/v1/admin` additionally requires
/// the admin role.
pub fn configure<S: RevocationStore + 'static>(cfg: &mut web::ServiceConfig, state: web::Data<AppState<S>>) {
    let jwt_auth = JwtAuth::new(state.token_service.clone());

    cfg.app_data(state)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/refresh", web::post().to(auth::refresh_token::<S>))
                        .service(
                            web::resource("/logout")
                                .wrap(jwt_auth.clone())
                                .route(web::post().to(auth::logout::<S>)),
                        )
                        .service(
                            web::resource("/session")
                                .wrap(jwt_auth.clone())
                                .route(web::get().to(auth::current_session)),
                        ),
                )
                .service(
                    web::scope("/admin")
                        .wrap(RequireRole::new(Role::Admin))
                        .wrap(jwt_auth)
                        .route("/revocations/cleanup", web::post().to(admin::run_cleanup::<S>)),
                ),
        );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "hearth-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
