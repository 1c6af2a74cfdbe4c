//! # SessionGate Core
//!
//! Domain layer for SessionGate: users and roles, JWT access/refresh token
//! issuance and verification, the role guard, and the authentication flows
//! (register, login, refresh) built on top of them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
