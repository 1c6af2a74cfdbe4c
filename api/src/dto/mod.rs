//! Request and response bodies of the HTTP API
//!
//! The wire types live in `sg_shared` so the client deserialises exactly what
//! the server sends.

pub use sg_shared::{
    ApiResponse, AuthResponse, ErrorBody, HealthResponse, LoginRequest, RefreshTokenRequest,
    RefreshTokenResponse, RegisterRequest, Role, UserDto,
};
