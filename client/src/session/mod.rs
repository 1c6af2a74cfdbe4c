//! Client session: the single source of truth for "is there a logged-in user"

mod manager;
mod state;

pub use manager::SessionManager;
pub use state::SessionState;
