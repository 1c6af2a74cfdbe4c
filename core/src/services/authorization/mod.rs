//! Role-based authorization
//!
//! [`authorize`] is the single decision function; [`RoutePolicy`] declares,
//! per route, which roles it requires. Authorization always runs after the
//! token has been verified into an [`Identity`].

mod policy;

pub use policy::{RoutePolicy, RouteRule};

use crate::domain::entities::user::{Identity, Role};
use crate::errors::DomainError;

/// Decides whether `identity` may access a resource requiring `required_roles`
///
/// An empty `required_roles` means any authenticated identity is allowed.
///
/// # Returns
///
/// * `Ok(())` - Access allowed
/// * `Err(DomainError::Forbidden)` - The identity's role is not in the set
pub fn authorize(identity: &Identity, required_roles: &[Role]) -> Result<(), DomainError> {
    if required_roles.is_empty() || identity.has_any_role(required_roles) {
        return Ok(());
    }

    tracing::debug!(
        user_id = %identity.user_id,
        role = %identity.role,
        required = ?required_roles,
        "Access denied by role guard"
    );
    Err(DomainError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_requirement_allows_everyone() {
        for role in [Role::User, Role::Admin] {
            let identity = Identity::new(Uuid::new_v4(), role);
            assert!(authorize(&identity, &[]).is_ok());
        }
    }

    #[test]
    fn test_allows_iff_role_in_set() {
        let sets: [&[Role]; 3] = [&[Role::Admin], &[Role::User], &[Role::User, Role::Admin]];

        for role in [Role::User, Role::Admin] {
            let identity = Identity::new(Uuid::new_v4(), role);
            for required in sets {
                let allowed = authorize(&identity, required).is_ok();
                assert_eq!(allowed, required.contains(&role), "{role} vs {required:?}");
            }
        }
    }

    #[test]
    fn test_denial_is_forbidden() {
        let identity = Identity::new(Uuid::new_v4(), Role::User);

        assert_eq!(
            authorize(&identity, &[Role::Admin]),
            Err(DomainError::Forbidden)
        );
    }
}
