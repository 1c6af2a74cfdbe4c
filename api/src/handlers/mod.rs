//! Error mapping and request validation shared by the route handlers

pub mod error;
pub mod validation;

pub use error::ApiError;
pub use validation::{json_config, validate_request};
