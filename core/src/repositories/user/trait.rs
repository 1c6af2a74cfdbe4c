//! User repository trait defining the interface for user data persistence.
//!
//! The user store is the only durable state of the system: tokens are
//! self-contained and never stored.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Emails handed to the repository are already normalised (trimmed and
/// lower-cased), so implementations may compare them byte for byte.
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use uuid::Uuid;
/// use sg_core::repositories::UserRepository;
/// use sg_core::domain::entities::user::User;
/// use sg_core::errors::DomainError;
///
/// struct NullUserRepository;
///
/// #[async_trait]
/// impl UserRepository for NullUserRepository {
///     async fn find_by_id(&self, _id: Uuid) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn create(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
///
///     async fn update(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
///
///     async fn list(&self) -> Result<Vec<User>, DomainError> {
///         Ok(Vec::new())
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by their unique identifier
    ///
    /// # Arguments
    /// * `id` - The UUID of the user
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by their normalised email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered with this email
    /// * `Err(DomainError)` - Storage error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The created user
    /// * `Err(DomainError::Credential(CredentialError::EmailTaken))` - The
    ///   email is already registered
    /// * `Err(DomainError)` - Storage error occurred
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user in the repository
    ///
    /// # Returns
    /// * `Ok(User)` - The updated user
    /// * `Err(DomainError::NotFound)` - No user with this id
    async fn update(&self, user: User) -> Result<User, DomainError>;

    /// List all users, oldest first
    async fn list(&self) -> Result<Vec<User>, DomainError>;
}
