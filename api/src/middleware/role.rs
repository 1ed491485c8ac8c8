//! Minimum-role guard, layered inside [`JwtAuth`](super::auth::JwtAuth).

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use hearth_core::Role;

use super::auth::AuthContext;
use super::reject;
use crate::handlers::ApiError;

/// Rejects authenticated callers below `minimum` with 403.
///
/// Requests that reach the guard without an [`AuthContext`] get 401, so the
/// guard must be wrapped inside the authentication middleware.
#[derive(Debug, Clone, Copy)]
pub struct RequireRole {
    minimum: Role,
}

impl RequireRole {
    pub fn new(minimum: Role) -> Self {
        Self { minimum }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            minimum: self.minimum,
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    minimum: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let role = req.extensions().get::<AuthContext>().map(|auth| auth.role);

        match role {
            Some(role) if role.at_least(self.minimum) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Some(role) => {
                log::debug!("Role {} below required {}", role, self.minimum);
                Box::pin(ready(Ok(reject(req, ApiError::Forbidden))))
            }
            None => Box::pin(ready(Ok(reject(req, ApiError::Unauthorized)))),
        }
    }
}
