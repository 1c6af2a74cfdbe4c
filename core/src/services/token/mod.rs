//! Token service module for JWT management
//!
//! This module handles all token-related operations:
//! - Issuing access/refresh token pairs (HS256)
//! - Verifying access tokens into an [`Identity`](crate::domain::entities::Identity)
//! - Verifying refresh tokens into a [`RefreshGrant`](crate::domain::value_objects::RefreshGrant)
//!
//! Tokens are self-contained; there is no server-side token registry.

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::TokenService;
