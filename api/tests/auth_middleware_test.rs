//! Integration tests for bearer authentication and the role guard

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpResponse};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use std::sync::Arc;
    use uuid::Uuid;

    use hearth_api::middleware::{AuthContext, JwtAuth, RequireRole};
    use hearth_core::{
        DomainError, InMemoryRevocationStore, RevocationStore, Role, TokenService, TokenServiceConfig,
    };

    fn token_service() -> Arc<TokenService<InMemoryRevocationStore>> {
        Arc::new(
            TokenService::new(
                Arc::new(InMemoryRevocationStore::new()),
                TokenServiceConfig::new("middleware-test-secret"),
            )
            .unwrap(),
        )
    }

    async fn whoami(auth: AuthContext) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "user_id": auth.user_id.to_string(),
            "email": auth.email,
            "role": auth.role,
        }))
    }

    #[actix_web::test]
    async fn test_middleware_requires_auth_header() {
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(token_service()))
                .route("/protected", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "unauthorized");
        assert_eq!(body["message"], "Invalid credentials");
    }

    #[actix_web::test]
    async fn test_middleware_rejects_invalid_token() {
        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(token_service()))
                .route("/protected", web::get().to(whoami)),
        )
        .await;

        for header in ["Bearer invalid-token", "Basic abc123", "Bearer", "bearer abc"] {
            let req = test::TestRequest::get()
                .uri("/protected")
                .insert_header(("Authorization", header))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 401, "{}", header);

            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], "Invalid credentials");
        }
    }

    #[actix_web::test]
    async fn test_middleware_accepts_valid_token() {
        let service = token_service();
        let user_id = Uuid::new_v4();
        let pair = service
            .issue_token_pair(user_id, "owner@hearth.test", Role::Owner, None)
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(Arc::clone(&service)))
                .route("/protected", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["user_id"], user_id.to_string());
        assert_eq!(body["role"], "owner");
    }

    #[actix_web::test]
    async fn test_middleware_rejects_refresh_and_revoked_tokens() {
        let service = token_service();
        let pair = service
            .issue_token_pair(Uuid::new_v4(), "owner@hearth.test", Role::Owner, None)
            .unwrap();
        service.revoke(&pair.access_token).await.unwrap();

        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(Arc::clone(&service)))
                .route("/protected", web::get().to(whoami)),
        )
        .await;

        for token in [&pair.access_token, &pair.refresh_token] {
            let req = test::TestRequest::get()
                .uri("/protected")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 401);
        }
    }

    #[actix_web::test]
    async fn test_auth_context_extractor() {
        // No middleware, so no context
        let app = test::init_service(App::new().route("/protected", web::get().to(whoami))).await;

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_web::test]
    async fn test_require_role() {
        let service = token_service();
        let agent = service
            .issue_token_pair(Uuid::new_v4(), "agent@hearth.test", Role::Agent, None)
            .unwrap();
        let agency = service
            .issue_token_pair(Uuid::new_v4(), "agency@hearth.test", Role::Agency, Some(Uuid::new_v4()))
            .unwrap();
        let admin = service
            .issue_token_pair(Uuid::new_v4(), "admin@hearth.test", Role::Admin, None)
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(RequireRole::new(Role::Agency))
                .wrap(JwtAuth::new(Arc::clone(&service)))
                .route("/agency-only", web::get().to(whoami)),
        )
        .await;

        for (token, expected) in [
            (&agent.access_token, 403u16),
            (&agency.access_token, 200),
            (&admin.access_token, 200),
        ] {
            let req = test::TestRequest::get()
                .uri("/agency-only")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }
    }

    #[actix_web::test]
    async fn test_require_role_without_authentication() {
        let app = test::init_service(
            App::new()
                .wrap(RequireRole::new(Role::Buyer))
                .route("/guarded", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get().uri("/guarded").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    /// Store that cannot be reached
    struct UnreachableStore;

    #[async_trait]
    impl RevocationStore for UnreachableStore {
        async fn insert(&self, _token: &str, _expires_at: Option<DateTime<Utc>>) -> Result<bool, DomainError> {
            Err(DomainError::Internal { message: "store down".to_string() })
        }

        async fn contains(&self, _token: &str) -> Result<bool, DomainError> {
            Err(DomainError::Internal { message: "store down".to_string() })
        }

        async fn remove(&self, _token: &str) -> Result<bool, DomainError> {
            Err(DomainError::Internal { message: "store down".to_string() })
        }

        async fn tokens(&self) -> Result<Vec<String>, DomainError> {
            Err(DomainError::Internal { message: "store down".to_string() })
        }
    }

    #[actix_web::test]
    async fn test_store_failure_fails_closed() {
        let service = Arc::new(
            TokenService::new(Arc::new(UnreachableStore), TokenServiceConfig::new("middleware-test-secret"))
                .unwrap(),
        );
        let pair = service
            .issue_token_pair(Uuid::new_v4(), "owner@hearth.test", Role::Owner, None)
            .unwrap();

        let app = test::init_service(
            App::new()
                .wrap(JwtAuth::new(service))
                .route("/protected", web::get().to(whoami)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/protected")
            .insert_header(("Authorization", format!("Bearer {}", pair.access_token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
