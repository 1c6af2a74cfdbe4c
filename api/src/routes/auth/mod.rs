//! Authentication route handlers
//!
//! This module contains the authentication endpoints:
//! - Registration and login, both returning a token pair and the user
//! - Token refresh
//! - Current user lookup for a bearer token

pub mod login;
pub mod me;
pub mod refresh;
pub mod register;

pub use login::login;
pub use me::me;
pub use refresh::refresh;
pub use register::register;
