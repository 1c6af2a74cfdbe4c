//! Domain-specific error types and error handling.

mod types;

// Re-export all error types
pub use types::{CredentialError, TokenRejection};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    // Bridge to specific error types
    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    TokenRejected(#[from] TokenRejection),

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Token refresh failed: {reason}")]
    RefreshFailed { reason: String },

    #[error("Token signing failed: {message}")]
    Signing { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Repository error: {message}")]
    Repository { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    /// Stable machine code for the error
    pub fn error_code(&self) -> &'static str {
        match self {
            DomainError::Credential(err) => err.code(),
            DomainError::TokenRejected(rejection) => rejection.code(),
            DomainError::Forbidden => "FORBIDDEN",
            DomainError::RefreshFailed { .. } => "REFRESH_FAILED",
            DomainError::Signing { .. } => "SIGNING_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::Repository { .. } | DomainError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Builds a `RefreshFailed` error
    pub fn refresh_failed(reason: impl Into<String>) -> Self {
        DomainError::RefreshFailed {
            reason: reason.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridged_errors_keep_their_codes() {
        let err: DomainError = TokenRejection::Expired.into();
        assert_eq!(err.error_code(), "TOKEN_EXPIRED");

        let err: DomainError = CredentialError::WeakPassword.into();
        assert_eq!(err.error_code(), "WEAK_PASSWORD");
        assert_eq!(
            err.to_string(),
            "Password does not meet the length requirements"
        );
    }

    #[test]
    fn test_forbidden_is_distinct_from_token_rejection() {
        assert_eq!(DomainError::Forbidden.error_code(), "FORBIDDEN");
        assert_ne!(
            DomainError::Forbidden,
            DomainError::TokenRejected(TokenRejection::InvalidSignature)
        );
    }

    #[test]
    fn test_refresh_failed_message() {
        let err = DomainError::refresh_failed("refresh token expired");
        assert_eq!(err.error_code(), "REFRESH_FAILED");
        assert_eq!(err.to_string(), "Token refresh failed: refresh token expired");
    }
}
