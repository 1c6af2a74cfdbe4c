//! Client error taxonomy
//!
//! Server failures arrive as `{message, statusCode, error}`; the `error` code
//! decides the variant so callers can branch without parsing messages.

use sg_shared::ErrorBody;

/// Why the server rejected an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// No bearer token was sent
    Missing,
    Malformed,
    InvalidSignature,
    Expired,
}

impl RejectionReason {
    /// Parses a server error code, `None` for codes that are not token rejections
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MISSING_TOKEN" => Some(Self::Missing),
            "TOKEN_MALFORMED" => Some(Self::Malformed),
            "TOKEN_INVALID_SIGNATURE" => Some(Self::InvalidSignature),
            "TOKEN_EXPIRED" => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Missing => "MISSING_TOKEN",
            Self::Malformed => "TOKEN_MALFORMED",
            Self::InvalidSignature => "TOKEN_INVALID_SIGNATURE",
            Self::Expired => "TOKEN_EXPIRED",
        }
    }
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors surfaced by the client library
///
/// `Clone` so a coalesced refresh can hand the same failure to every caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Registration or login was refused
    #[error("{message}")]
    Credential { code: String, message: String },

    #[error("Access token rejected: {0}")]
    TokenRejected(RejectionReason),

    #[error("Insufficient role")]
    Forbidden,

    /// The session cannot be renewed and has been ended
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    /// Any other error response
    #[error("API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

const CREDENTIAL_CODES: [&str; 4] = [
    "INVALID_EMAIL",
    "EMAIL_TAKEN",
    "INVALID_CREDENTIALS",
    "WEAK_PASSWORD",
];

impl ClientError {
    /// Classifies an error response body
    pub fn from_error_body(status: u16, body: ErrorBody) -> Self {
        let code = body.error.unwrap_or_else(|| "UNKNOWN".to_string());

        if let Some(reason) = RejectionReason::from_code(&code) {
            return ClientError::TokenRejected(reason);
        }

        match code.as_str() {
            "FORBIDDEN" => ClientError::Forbidden,
            "REFRESH_FAILED" => ClientError::RefreshFailed(body.message),
            c if CREDENTIAL_CODES.contains(&c) => ClientError::Credential {
                code,
                message: body.message,
            },
            _ => ClientError::Api {
                status,
                code,
                message: body.message,
            },
        }
    }

    /// Whether this is a token rejection the session can recover from by refreshing
    pub fn is_expired_token(&self) -> bool {
        matches!(self, ClientError::TokenRejected(RejectionReason::Expired))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}
