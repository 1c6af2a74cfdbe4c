//! Configuration for the authentication service

use sg_shared::types::auth::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Minimum accepted password length, in characters
    pub min_password_length: usize,
    /// Maximum accepted password length, in characters
    pub max_password_length: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
            min_password_length: MIN_PASSWORD_LENGTH as usize,
            max_password_length: MAX_PASSWORD_LENGTH as usize,
        }
    }
}

impl AuthServiceConfig {
    /// Set the bcrypt cost (tests use the minimum of 4)
    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Checks a password against the length bounds
    pub fn accepts_password(&self, password: &str) -> bool {
        let len = password.chars().count();
        len >= self.min_password_length && len <= self.max_password_length
    }
}
