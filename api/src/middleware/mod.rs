pub mod auth;
pub mod role;

use actix_web::{
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};

use crate::handlers::ApiError;

pub use auth::{AuthContext, JwtAuth};
pub use role::RequireRole;

/// Short-circuits a request with the error's response
fn reject<B>(req: ServiceRequest, error: ApiError) -> ServiceResponse<EitherBody<B>> {
    req.error_response(error).map_into_right_body()
}
