//! API response types and wrappers

use serde::{Deserialize, Serialize};

/// Success envelope: every successful API response is `{data, message?}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
    /// Response payload
    pub data: T,

    /// Optional human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wrap data without a message
    pub fn new(data: T) -> Self {
        Self { data, message: None }
    }

    /// Wrap data with a message
    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: Some(message.into()),
        }
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> T {
        self.data
    }
}

/// Error body: every failed API response is `{message, statusCode, error?}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Human-readable error message
    pub message: String,

    /// HTTP status code, repeated in the body
    pub status_code: u16,

    /// Stable machine-readable error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    /// Create a new error body
    pub fn new(status_code: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            error: Some(error.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status
    pub status: String,

    /// Service name
    pub service: String,

    /// Service version
    pub version: String,

    /// Check timestamp (RFC 3339)
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_response_omits_missing_message() {
        let response = ApiResponse::new(vec![1, 2, 3]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "data": [1, 2, 3] }));
    }

    #[test]
    fn test_api_response_with_message() {
        let response = ApiResponse::with_message("ok", "Login successful");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({ "data": "ok", "message": "Login successful" }));
    }

    #[test]
    fn test_error_body_uses_camel_case() {
        let body = ErrorBody::new(403, "FORBIDDEN", "Insufficient role");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({ "message": "Insufficient role", "statusCode": 403, "error": "FORBIDDEN" })
        );

        let parsed: ErrorBody =
            serde_json::from_value(json!({ "message": "Unauthorized", "statusCode": 401 })).unwrap();
        assert_eq!(parsed.error, None);
    }
}
