//! Route gating decision for role-gated pages

use sg_shared::Role;

use crate::session::SessionState;

/// Where unauthenticated visitors are sent
pub const LOGIN_PATH: &str = "/login";

/// Where users lacking a page's role are sent
pub const DASHBOARD_PATH: &str = "/dashboard";

/// What a protected page should do for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Startup check still running; show a placeholder
    Loading,
    RedirectToLogin,
    /// Logged in without the required role
    RedirectToDashboard,
    Render,
}

impl RouteDecision {
    /// Redirect target, if any
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            RouteDecision::RedirectToLogin => Some(LOGIN_PATH),
            RouteDecision::RedirectToDashboard => Some(DASHBOARD_PATH),
            RouteDecision::Loading | RouteDecision::Render => None,
        }
    }
}

/// Decide whether a protected page may render
///
/// # Arguments
///
/// * `state` - Current session state
/// * `required_role` - Role the page needs, `None` for any logged-in user
pub fn route_access(state: &SessionState, required_role: Option<Role>) -> RouteDecision {
    match state {
        SessionState::Unknown => RouteDecision::Loading,
        SessionState::LoggedOut => RouteDecision::RedirectToLogin,
        SessionState::LoggedIn(user) => match required_role {
            Some(role) if user.role != role => RouteDecision::RedirectToDashboard,
            _ => RouteDecision::Render,
        },
    }
}
