use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::collections::HashMap;

use hearth_core::errors::{DomainError, TokenError};

use crate::dto::ErrorResponse;

/// Errors returned to HTTP clients.
///
/// Credential failures all collapse into one generic 401 body; the reason is
/// only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Insufficient privileges")]
    Forbidden,

    #[error("Invalid request")]
    BadRequest(HashMap<String, serde_json::Value>),

    #[error("An internal error occurred")]
    Internal,
}

impl ApiError {
    /// Maps a failure from validating a presented credential.
    ///
    /// Store failures land here too and are reported as 401, so a request is
    /// never let through because revocations could not be checked.
    pub fn from_credential_check(error: DomainError) -> Self {
        match error {
            DomainError::Token(TokenError::TokenGenerationFailed) => {
                log::error!("Token generation failed during credential check");
                ApiError::Internal
            }
            DomainError::Internal { message } => {
                log::error!("Credential check failed closed: {}", message);
                ApiError::Unauthorized
            }
            other => {
                log::debug!("Credential rejected: {}", other);
                ApiError::Unauthorized
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Token(e) if e.is_credential_failure() => {
                log::debug!("Credential rejected: {}", e);
                ApiError::Unauthorized
            }
            DomainError::Unauthorized => ApiError::Unauthorized,
            DomainError::Validation { message } => {
                let mut details = HashMap::new();
                details.insert("reason".to_string(), serde_json::Value::String(message));
                ApiError::BadRequest(details)
            }
            other => {
                log::error!("API Error: {:?}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = errors
            .field_errors()
            .into_iter()
            .map(|(field, _)| {
                (
                    field.to_string(),
                    serde_json::Value::String("invalid".to_string()),
                )
            })
            .collect();
        ApiError::BadRequest(details)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::Unauthorized => ErrorResponse::new("unauthorized", self.to_string()),
            ApiError::Forbidden => ErrorResponse::new("forbidden", self.to_string()),
            ApiError::BadRequest(details) => {
                ErrorResponse::new("bad_request", self.to_string()).with_details(details.clone())
            }
            ApiError::Internal => ErrorResponse::new("internal_error", self.to_string()),
        };
        body.to_response(self.status_code())
    }
}
