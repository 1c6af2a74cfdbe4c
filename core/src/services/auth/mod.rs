//! Authentication service module
//!
//! This module provides the authentication flows:
//! - Registration and login with email and password (bcrypt)
//! - Token issuance and refresh rotation
//! - Current-user lookup and admin user listing
//! - Role changes for existing users

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use service::{normalize_email, AuthService};
