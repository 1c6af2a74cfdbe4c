//! Error types for credential checks and token verification
//!
//! Each variant maps to a stable machine code that is sent to clients in the
//! `error` field of the error body, so clients can tell the kinds apart
//! without parsing messages.

use thiserror::Error;

/// Why a presented token was not accepted
///
/// Verification stops at the first failing step, in the order the variants
/// are declared.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRejection {
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,
}

impl TokenRejection {
    /// Machine code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "TOKEN_MALFORMED",
            TokenRejection::InvalidSignature => "TOKEN_INVALID_SIGNATURE",
            TokenRejection::Expired => "TOKEN_EXPIRED",
        }
    }

    /// Parses a machine code back into a rejection
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "TOKEN_MALFORMED" => Some(TokenRejection::Malformed),
            "TOKEN_INVALID_SIGNATURE" => Some(TokenRejection::InvalidSignature),
            "TOKEN_EXPIRED" => Some(TokenRejection::Expired),
            _ => None,
        }
    }
}

/// Credential errors raised by register and login
///
/// Never retried automatically.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password does not meet the length requirements")]
    WeakPassword,
}

impl CredentialError {
    pub fn code(&self) -> &'static str {
        match self {
            CredentialError::InvalidEmail => "INVALID_EMAIL",
            CredentialError::EmailTaken => "EMAIL_TAKEN",
            CredentialError::InvalidCredentials => "INVALID_CREDENTIALS",
            CredentialError::WeakPassword => "WEAK_PASSWORD",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INVALID_EMAIL" => Some(CredentialError::InvalidEmail),
            "EMAIL_TAKEN" => Some(CredentialError::EmailTaken),
            "INVALID_CREDENTIALS" => Some(CredentialError::InvalidCredentials),
            "WEAK_PASSWORD" => Some(CredentialError::WeakPassword),
            _ => None,
        }
    }
}
