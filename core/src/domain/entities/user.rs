//! User entity representing a registered account in SessionGate.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sg_shared::UserDto;

pub use sg_shared::Role;

/// User entity as held by the user store
///
/// The `password_hash` never leaves the server; use [`User::to_dto`] for the
/// public projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Normalised (trimmed, lower-cased) email address
    pub email: String,

    /// bcrypt hash of the user's password
    pub password_hash: String,

    /// Role granted to the user
    pub role: Role,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with the default `USER` role
    ///
    /// # Arguments
    ///
    /// * `email` - The normalised email address
    /// * `password_hash` - bcrypt hash of the password
    ///
    /// # Returns
    ///
    /// A new `User` instance with a fresh id
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            role: Role::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Changes the user's role and bumps `updated_at`
    ///
    /// Tokens already issued keep the role they were issued with.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Checks whether the user holds the admin role
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Identity a freshly issued access token for this user resolves to
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.role)
    }

    /// Public projection of the user record
    pub fn to_dto(&self) -> UserDto {
        UserDto {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Identity carried by a verified access token
///
/// The role is the one embedded at issuance, not necessarily the user's
/// current role in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Checks whether the identity's role is one of `roles`
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}
