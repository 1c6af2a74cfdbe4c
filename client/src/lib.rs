//! # SessionGate Client
//!
//! Client-side session library for the SessionGate API:
//! - [`HttpAuthApi`] talks to the server and unwraps its `{data}` envelope
//! - [`TokenStorage`] persists the token pair (in memory or in a file)
//! - [`SessionManager`] owns the session state machine, silent refresh included
//! - [`route_access`] decides whether a role-gated page may render

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod session;
pub mod storage;

pub use api::{AuthApi, HttpAuthApi};
pub use config::ClientConfig;
pub use error::{ClientError, RejectionReason};
pub use guard::{route_access, RouteDecision};
pub use session::{SessionManager, SessionState};
pub use storage::{FileTokenStorage, MemoryTokenStorage, StoredTokens, TokenStorage};
