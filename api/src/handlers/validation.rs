//! Request body parsing and validation

use actix_web::web;
use validator::{Validate, ValidationErrors};

use super::error::ApiError;

/// Maximum accepted JSON body size
const JSON_LIMIT: usize = 16 * 1024;

/// JSON extractor configuration
///
/// Unparsable bodies become a 400 `VALIDATION_ERROR` in the standard error
/// body instead of actix's plain-text error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| ApiError::validation(format!("Invalid request body: {err}")).into())
}

/// Validate a request body, collecting every field error into one message
pub fn validate_request<T: Validate>(request: &T) -> Result<(), ApiError> {
    request
        .validate()
        .map_err(|errors| ApiError::validation(describe(&errors)))
}

fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{}: {}", field, reasons.join(", "))
        })
        .collect();
    parts.sort();
    format!("Validation failed: {}", parts.join("; "))
}
