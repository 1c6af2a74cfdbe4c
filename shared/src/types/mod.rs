//! Wire types shared by the server and the client
//!
//! - `auth` - Request and response bodies of the `/auth` and `/users` endpoints
//! - `response` - Success envelope, error body and health check
//! - `role` - User roles

pub mod auth;
pub mod response;
pub mod role;

pub use auth::{
    AuthResponse, LoginRequest, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest,
    UserDto,
};
pub use response::{ApiResponse, ErrorBody, HealthResponse};
pub use role::Role;
