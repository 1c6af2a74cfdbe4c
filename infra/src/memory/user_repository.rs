//! In-memory user store backed by a `RwLock<HashMap>`.
//!
//! Contents are lost when the process exits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use sg_core::domain::entities::user::User;
use sg_core::errors::{CredentialError, DomainError};
use sg_core::repositories::UserRepository;

/// In-memory implementation of UserRepository
///
/// Cloning shares the underlying store.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        // Uniqueness is checked under the write lock so concurrent
        // registrations of one email cannot both succeed
        if users.values().any(|u| u.email == user.email) {
            return Err(CredentialError::EmailTaken.into());
        }

        users.insert(user.id, user.clone());
        tracing::debug!(user_id = %user.id, "User stored in memory");
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(user)
            }
            None => Err(DomainError::NotFound {
                resource: format!("user {}", user.id),
            }),
        }
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sg_core::domain::entities::user::Role;

    fn user(email: &str) -> User {
        User::new(email.to_string(), "hash".to_string())
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo.create(user("a@x.com")).await.unwrap();

        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(
            repo.find_by_email("a@x.com").await.unwrap().map(|u| u.id),
            Some(created.id)
        );
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_taken() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@x.com")).await.unwrap();

        let result = repo.create(user("a@x.com")).await;

        assert_eq!(
            result.unwrap_err(),
            DomainError::Credential(CredentialError::EmailTaken)
        );
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_registration_of_one_email() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.create(user("race@x.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
    }

    #[tokio::test]
    async fn test_update_requires_existing_user() {
        let repo = InMemoryUserRepository::new();
        let mut stored = repo.create(user("a@x.com")).await.unwrap();

        stored.set_role(Role::Admin);
        let updated = repo.update(stored.clone()).await.unwrap();
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(
            repo.find_by_id(stored.id).await.unwrap().unwrap().role,
            Role::Admin
        );

        let missing = repo.update(user("b@x.com")).await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_returns_everyone() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.is_empty().await);

        for email in ["a@x.com", "b@x.com", "c@x.com"] {
            repo.create(user(email)).await.unwrap();
        }

        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 3);
    }
}
