//! Integration tests for the session endpoints wired through `app::configure`

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use chrono::Duration;
    use serde_json::json;
    use std::sync::Arc;
    use uuid::Uuid;

    use hearth_api::app::configure;
    use hearth_api::routes::AppState;
    use hearth_core::{
        InMemoryRevocationStore, Role, TokenCleanupConfig, TokenPair, TokenService, TokenServiceConfig,
    };

    fn state_with(config: TokenServiceConfig) -> web::Data<AppState<InMemoryRevocationStore>> {
        let service = Arc::new(TokenService::new(Arc::new(InMemoryRevocationStore::new()), config).unwrap());
        web::Data::new(AppState::new(service, TokenCleanupConfig::default()))
    }

    fn state() -> web::Data<AppState<InMemoryRevocationStore>> {
        state_with(TokenServiceConfig::new("routes-test-secret"))
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state()))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_session_returns_identity() {
        let state = state();
        let user_id = Uuid::new_v4();
        let agency_id = Uuid::new_v4();
        let pair = state
            .token_service
            .issue_token_pair(user_id, "agent@hearth.test", Role::Agent, Some(agency_id))
            .unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .insert_header(bearer(&pair.access_token))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["user_id"], user_id.to_string());
        assert_eq!(body["email"], "agent@hearth.test");
        assert_eq!(body["role"], "agent");
        assert_eq!(body["agency_id"], agency_id.to_string());
    }

    #[actix_web::test]
    async fn test_logout_revokes_both_tokens() {
        let state = state();
        let pair = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "buyer@hearth.test", Role::Buyer, None)
            .unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(bearer(&pair.access_token))
            .set_json(json!({ "refresh_token": pair.refresh_token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        assert!(state.token_service.is_revoked(&pair.access_token).await.unwrap());
        assert!(state.token_service.is_revoked(&pair.refresh_token).await.unwrap());

        // The same access token no longer opens the session endpoint
        let req = test::TestRequest::get()
            .uri("/api/v1/auth/session")
            .insert_header(bearer(&pair.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_logout_without_body() {
        let state = state();
        let pair = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "buyer@hearth.test", Role::Buyer, None)
            .unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(bearer(&pair.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        assert!(state.token_service.is_revoked(&pair.access_token).await.unwrap());
        assert!(!state.token_service.is_revoked(&pair.refresh_token).await.unwrap());
    }

    #[actix_web::test]
    async fn test_logout_rejects_someone_elses_refresh_token() {
        let state = state();
        let caller = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "buyer@hearth.test", Role::Buyer, None)
            .unwrap();
        let victim = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "owner@hearth.test", Role::Owner, None)
            .unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(bearer(&caller.access_token))
            .set_json(json!({ "refresh_token": victim.refresh_token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        assert!(!state.token_service.is_revoked(&victim.refresh_token).await.unwrap());
        assert!(!state.token_service.is_revoked(&caller.access_token).await.unwrap());
        assert_eq!(state.token_service.store().len().await, 0);
    }

    #[actix_web::test]
    async fn test_logout_rejects_arbitrary_refresh_string() {
        let state = state();
        let pair = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "buyer@hearth.test", Role::Buyer, None)
            .unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(bearer(&pair.access_token))
            .set_json(json!({ "refresh_token": "x".repeat(4096) }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
        assert_eq!(state.token_service.store().len().await, 0);
    }

    #[actix_web::test]
    async fn test_logout_skips_already_revoked_refresh_token() {
        let state = state();
        let pair = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "buyer@hearth.test", Role::Buyer, None)
            .unwrap();
        state.token_service.revoke_refresh(&pair.refresh_token).await.unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/logout")
            .insert_header(bearer(&pair.access_token))
            .set_json(json!({ "refresh_token": pair.refresh_token }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        assert!(state.token_service.is_revoked(&pair.access_token).await.unwrap());
    }

    #[actix_web::test]
    async fn test_logout_requires_authentication() {
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state()))).await;

        let req = test::TestRequest::post().uri("/api/v1/auth/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_refresh_issues_new_pair() {
        // Access tokens expire immediately, as they would have by refresh time
        let state = state_with(
            TokenServiceConfig::new("routes-test-secret").with_lifetimes(Duration::zero(), Duration::days(1)),
        );
        let user_id = Uuid::new_v4();
        let pair = state
            .token_service
            .issue_token_pair(user_id, "owner@hearth.test", Role::Owner, None)
            .unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({
                "refresh_token": pair.refresh_token,
                "access_token": pair.access_token,
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let rotated: TokenPair = test::read_body_json(resp).await;
        assert_eq!(rotated.token_type, "Bearer");
        assert_ne!(rotated.access_token, pair.access_token);

        let refresh_claims = state
            .token_service
            .validate_refresh_token(&rotated.refresh_token)
            .await
            .unwrap();
        assert_eq!(refresh_claims.user_id, user_id);
    }

    #[actix_web::test]
    async fn test_refresh_with_bad_token_is_generic_401() {
        let state = state();
        let pair = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "owner@hearth.test", Role::Owner, None)
            .unwrap();
        state.token_service.revoke_refresh(&pair.refresh_token).await.unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        for refresh_token in ["garbage", pair.refresh_token.as_str()] {
            let req = test::TestRequest::post()
                .uri("/api/v1/auth/refresh")
                .set_json(json!({
                    "refresh_token": refresh_token,
                    "access_token": pair.access_token,
                }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 401);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "unauthorized");
            assert_eq!(body["message"], "Invalid credentials");
        }
    }

    #[actix_web::test]
    async fn test_refresh_rejects_empty_fields() {
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/auth/refresh")
            .set_json(json!({ "refresh_token": "", "access_token": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_admin_cleanup_requires_admin() {
        let state = state();
        let owner = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "owner@hearth.test", Role::Owner, None)
            .unwrap();
        let admin = state
            .token_service
            .issue_token_pair(Uuid::new_v4(), "admin@hearth.test", Role::Admin, None)
            .unwrap();
        state.token_service.revoke("not-a-token").await.unwrap();
        let app = test::init_service(App::new().configure(|cfg| configure(cfg, state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/revocations/cleanup")
            .insert_header(bearer(&owner.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/revocations/cleanup")
            .insert_header(bearer(&admin.access_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["malformed_removed"], 1);
        assert_eq!(body["skipped"], false);
    }
}
