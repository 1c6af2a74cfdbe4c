//! # Infrastructure Layer
//!
//! Concrete implementations of the [`UserRepository`](sg_core::repositories::UserRepository)
//! port used by the SessionGate server.
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL user store using SQLx (default)
//!
//! Without a database URL the server falls back to [`InMemoryUserRepository`].

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// In-process user store
pub mod memory;

pub use memory::InMemoryUserRepository;

#[cfg(feature = "mysql")]
pub use database::{create_pool, DatabasePool, MySqlUserRepository};

use sg_core::errors::DomainError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        DomainError::Repository {
            message: err.to_string(),
        }
    }
}
