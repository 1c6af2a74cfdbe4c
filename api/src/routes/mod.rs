//! Route handlers
//!
//! - `auth` - register, login, refresh and current user
//! - `users` - admin-only user listing and lookup

pub mod auth;
pub mod users;
