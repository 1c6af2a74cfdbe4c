//! Business services containing domain logic and use cases.

pub mod auth;
pub mod authorization;
pub mod token;

// Re-export commonly used types
pub use auth::{normalize_email, AuthService, AuthServiceConfig};
pub use authorization::{authorize, RoutePolicy, RouteRule};
pub use token::{TokenService, TokenServiceConfig};
