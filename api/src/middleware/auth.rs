//! Bearer authentication middleware for protecting API endpoints.
//!
//! The middleware reads the `Authorization` header, validates the access token
//! through the core [`TokenService`] (which consults the revocation store), and
//! injects an [`AuthContext`] into the request. Every failure produces the same
//! 401 body, returned as a response rather than an error so outer middleware
//! such as the access logger still sees it.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use hearth_core::{
    extract_token_from_header, AccessClaims, IdentityInfo, RevocationStore, Role, TokenService,
};

use super::reject;
use crate::handlers::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
    pub agency_id: Option<Uuid>,
    /// The access token the request was authenticated with
    pub token: String,
}

impl AuthContext {
    pub fn from_claims(claims: AccessClaims, token: String) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
            agency_id: claims.agency_id,
            token,
        }
    }

    pub fn identity(&self) -> IdentityInfo {
        IdentityInfo {
            user_id: self.user_id,
            email: self.email.clone(),
            role: self.role,
            agency_id: self.agency_id,
        }
    }
}

/// Bearer authentication middleware factory
pub struct JwtAuth<S: RevocationStore + 'static> {
    token_service: Arc<TokenService<S>>,
}

impl<S: RevocationStore + 'static> JwtAuth<S> {
    pub fn new(token_service: Arc<TokenService<S>>) -> Self {
        Self { token_service }
    }
}

impl<S: RevocationStore + 'static> Clone for JwtAuth<S> {
    fn clone(&self) -> Self {
        Self {
            token_service: Arc::clone(&self.token_service),
        }
    }
}

impl<Svc, B, S> Transform<Svc, ServiceRequest> for JwtAuth<S>
where
    Svc: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    Svc::Future: 'static,
    B: 'static,
    S: RevocationStore + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<Svc, S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: Svc) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            token_service: Arc::clone(&self.token_service),
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<Svc, S: RevocationStore + 'static> {
    service: Rc<Svc>,
    token_service: Arc<TokenService<S>>,
}

impl<Svc, B, S> Service<ServiceRequest> for JwtAuthMiddleware<Svc, S>
where
    Svc: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    Svc::Future: 'static,
    B: 'static,
    S: RevocationStore + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token_service = Arc::clone(&self.token_service);

        Box::pin(async move {
            let token = match bearer_token(&req) {
                Some(token) => token,
                None => {
                    log::debug!("Missing or malformed Authorization header");
                    return Ok(reject(req, ApiError::Unauthorized));
                }
            };

            let claims = match token_service.validate_access_token(&token).await {
                Ok(claims) => claims,
                Err(e) => return Ok(reject(req, ApiError::from_credential_check(e))),
            };

            req.extensions_mut()
                .insert(AuthContext::from_claims(claims, token));

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Reads the bearer token from the Authorization header
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    extract_token_from_header(header).ok().map(str::to_owned)
}

impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized.into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[::core::prelude::v1::test]
    fn test_bearer_token() {
        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(bearer_token(&req_no_bearer), None);

        let req_lowercase = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "bearer test_token_123"))
            .to_srv_request();
        assert_eq!(bearer_token(&req_lowercase), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(bearer_token(&req_no_header), None);
    }
}
