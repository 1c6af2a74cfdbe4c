//! Declarative route → required-roles table

use crate::domain::entities::user::{Identity, Role};
use crate::errors::DomainError;

use super::authorize;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
}

/// One entry of a [`RoutePolicy`]
#[derive(Debug, Clone)]
pub struct RouteRule {
    method: String,
    segments: Vec<Segment>,
    roles: Vec<Role>,
}

impl RouteRule {
    /// Creates a rule
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method, matched case-insensitively
    /// * `pattern` - Path pattern; a `{name}` segment matches any single
    ///   non-empty segment
    /// * `roles` - Roles allowed on the route, empty for authenticated-only
    pub fn new(method: &str, pattern: &str, roles: &[Role]) -> Self {
        let segments = split_path(pattern)
            .map(|segment| {
                if segment.starts_with('{') && segment.ends_with('}') {
                    Segment::Param
                } else {
                    Segment::Literal(segment.to_string())
                }
            })
            .collect();

        Self {
            method: method.to_ascii_uppercase(),
            segments,
            roles: roles.to_vec(),
        }
    }

    /// Checks whether the rule applies to a request
    pub fn matches(&self, method: &str, path: &str) -> bool {
        if !self.method.eq_ignore_ascii_case(method) {
            return false;
        }

        let mut parts = split_path(path);
        for segment in &self.segments {
            match (segment, parts.next()) {
                (Segment::Literal(expected), Some(actual)) if expected == actual => {}
                (Segment::Param, Some(_)) => {}
                _ => return false,
            }
        }
        parts.next().is_none()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

/// Non-empty segments of a path, query and fragment removed
///
/// Empty segments are dropped, so `/users/`, `//users` and `/users` all
/// resolve to the same rule. Paths are compared as given; callers pass the
/// already-decoded path the router matched on.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty())
}

/// Static table of role requirements per route
///
/// Lookups are first-match. A route with no rule is authenticated-only.
///
/// # Example
///
/// ```
/// use sg_core::{Role, RoutePolicy};
///
/// let policy = RoutePolicy::new()
///     .require("GET", "/users", &[Role::Admin])
///     .require("GET", "/users/{id}", &[Role::Admin]);
///
/// assert_eq!(policy.required_roles("GET", "/users/42"), &[Role::Admin]);
/// assert!(policy.required_roles("GET", "/auth/me").is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
}

impl RoutePolicy {
    /// Creates an empty policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule and returns the policy
    pub fn require(mut self, method: &str, pattern: &str, roles: &[Role]) -> Self {
        self.rules.push(RouteRule::new(method, pattern, roles));
        self
    }

    /// Roles required by the first matching rule, or none when unlisted
    pub fn required_roles(&self, method: &str, path: &str) -> &[Role] {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(RouteRule::roles)
            .unwrap_or(&[])
    }

    /// Authorizes a verified identity for a request
    pub fn authorize(&self, identity: &Identity, method: &str, path: &str) -> Result<(), DomainError> {
        authorize(identity, self.required_roles(method, path))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn admin_policy() -> RoutePolicy {
        RoutePolicy::new()
            .require("GET", "/users", &[Role::Admin])
            .require("get", "/users/{id}", &[Role::Admin])
    }

    #[test]
    fn test_literal_and_param_matching() {
        let rule = RouteRule::new("GET", "/users/{id}", &[Role::Admin]);

        assert!(rule.matches("GET", "/users/123"));
        assert!(rule.matches("get", "/users/123/"));
        assert!(rule.matches("GET", "/users/123?expand=true"));
        assert!(!rule.matches("GET", "/users"));
        assert!(!rule.matches("GET", "/users/123/posts"));
        assert!(!rule.matches("POST", "/users/123"));
    }

    #[test]
    fn test_empty_segments_collapse() {
        let policy = admin_policy();

        assert_eq!(policy.required_roles("GET", "//users"), &[Role::Admin]);
        assert_eq!(policy.required_roles("GET", "/users//42/"), &[Role::Admin]);
        assert_eq!(policy.required_roles("GET", "users"), &[Role::Admin]);
    }

    #[test]
    fn test_unlisted_route_requires_nothing() {
        let policy = admin_policy();

        assert!(policy.required_roles("GET", "/auth/me").is_empty());
        assert!(policy.required_roles("DELETE", "/users").is_empty());
    }

    #[test]
    fn test_policy_authorize() {
        let policy = admin_policy();
        let user = Identity::new(Uuid::new_v4(), Role::User);
        let admin = Identity::new(Uuid::new_v4(), Role::Admin);

        assert_eq!(
            policy.authorize(&user, "GET", "/users"),
            Err(DomainError::Forbidden)
        );
        assert!(policy.authorize(&admin, "GET", "/users").is_ok());
        assert!(policy.authorize(&admin, "GET", "/users/abc").is_ok());
        assert!(policy.authorize(&user, "GET", "/auth/me").is_ok());
        assert_eq!(policy.len(), 2);
    }
}
