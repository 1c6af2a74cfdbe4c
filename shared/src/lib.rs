//! Shared configuration and wire types for SessionGate
//!
//! This crate provides the pieces used by both the server and the client:
//! - Configuration types loaded from the environment
//! - Request/response bodies of the auth API, shared by both ends
//! - The `{data, message}` success envelope and `{message, statusCode, error}` error body

pub mod config;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, DatabaseConfig, Environment, JwtConfig, LogFormat, LoggingConfig, ServerConfig,
};
pub use types::{
    ApiResponse, AuthResponse, ErrorBody, HealthResponse, LoginRequest, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, Role, UserDto,
};
