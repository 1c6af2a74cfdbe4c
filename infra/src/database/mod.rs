//! Database module - MySQL implementations using SQLx
//!
//! This module provides the database access layer:
//! - Connection pool management
//! - The MySQL user store

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{create_pool, DatabasePool};
pub use mysql::MySqlUserRepository;
