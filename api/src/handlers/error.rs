//! Mapping of domain errors to HTTP responses
//!
//! Every failure leaves the server as `{message, statusCode, error}` where
//! `error` is a stable machine code the client can branch on.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sg_core::errors::{CredentialError, DomainError};
use sg_shared::ErrorBody;

/// Errors returned by the HTTP layer
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No `Authorization: Bearer <token>` header on a guarded route
    #[error("Missing or invalid Authorization header")]
    MissingToken,

    /// Request body failed to parse or validate
    #[error("{message}")]
    Validation { message: String },

    /// No route matched
    #[error("The requested resource was not found")]
    RouteNotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
        }
    }

    /// Stable machine code sent in the `error` field
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::MissingToken => "MISSING_TOKEN",
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::RouteNotFound => "NOT_FOUND",
            ApiError::Domain(err) => err.error_code(),
        }
    }

    /// Message sent to the client
    ///
    /// Internal failures are not described to the caller.
    fn public_message(&self) -> String {
        match self {
            ApiError::Domain(DomainError::Repository { .. })
            | ApiError::Domain(DomainError::Internal { .. })
            | ApiError::Domain(DomainError::Signing { .. }) => {
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingToken => StatusCode::UNAUTHORIZED,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Domain(err) => match err {
                DomainError::Credential(CredentialError::InvalidEmail)
                | DomainError::Credential(CredentialError::WeakPassword) => StatusCode::BAD_REQUEST,
                DomainError::Credential(CredentialError::EmailTaken) => StatusCode::CONFLICT,
                DomainError::Credential(CredentialError::InvalidCredentials) => {
                    StatusCode::UNAUTHORIZED
                }
                DomainError::TokenRejected(_) | DomainError::RefreshFailed { .. } => {
                    StatusCode::UNAUTHORIZED
                }
                DomainError::Forbidden => StatusCode::FORBIDDEN,
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
                DomainError::Signing { .. }
                | DomainError::Repository { .. }
                | DomainError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "Request rejected");
        }

        HttpResponse::build(status).json(ErrorBody::new(
            status.as_u16(),
            self.error_code(),
            self.public_message(),
        ))
    }
}
