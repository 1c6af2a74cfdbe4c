//! # SessionGate API
//!
//! actix-web server exposing the auth endpoints and the role-gated user
//! routes. Library exports are used by the binary and the integration tests.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, default_route_policy, AppState};
pub use handlers::error::ApiError;
