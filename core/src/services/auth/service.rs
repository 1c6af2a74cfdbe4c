//! Main authentication service implementation

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{Identity, Role, User};
use crate::domain::value_objects::AuthOutcome;
use crate::errors::{CredentialError, DomainError, DomainResult};
use crate::repositories::UserRepository;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};

/// Normalise an email for lookup and storage: trimmed and lower-cased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Authentication service for the register / login / refresh flows
pub struct AuthService<U: UserRepository> {
    /// User repository for persistence
    user_repository: Arc<U>,
    /// Token service for JWT management
    token_service: Arc<TokenService>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<U: UserRepository> AuthService<U> {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_service` - Service for JWT token management
    /// * `config` - Service configuration
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            config,
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService> {
        &self.token_service
    }

    pub fn user_repository(&self) -> &Arc<U> {
        &self.user_repository
    }

    /// Register a new user and log them in
    ///
    /// This method:
    /// 1. Normalises and validates the email
    /// 2. Checks the password length bounds
    /// 3. Rejects an email that is already registered
    /// 4. Stores the user with a bcrypt hash and the `USER` role
    /// 5. Issues a token pair
    ///
    /// # Arguments
    ///
    /// * `email` - The email address, normalised before use
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// * `Ok(AuthOutcome)` - Tokens and the created user
    /// * `Err(DomainError::Credential)` - Invalid email, weak password or
    ///   email already taken
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<AuthOutcome> {
        let email = normalize_email(email);
        if !email.validate_email() {
            return Err(CredentialError::InvalidEmail.into());
        }
        if !self.config.accepts_password(password) {
            return Err(CredentialError::WeakPassword.into());
        }

        if self.user_repository.find_by_email(&email).await?.is_some() {
            tracing::info!(email = %email, "Registration rejected, email already registered");
            return Err(CredentialError::EmailTaken.into());
        }

        let password_hash = hash_password(password, self.config.bcrypt_cost).await?;
        let user = self
            .user_repository
            .create(User::new(email, password_hash))
            .await?;

        let tokens = self.token_service.issue(&user)?;
        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(AuthOutcome::new(tokens, user))
    }

    /// Log in with email and password
    ///
    /// Unknown email and wrong password fail identically.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthOutcome)` - Tokens and the authenticated user
    /// * `Err(DomainError::Credential(CredentialError::InvalidCredentials))`
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<AuthOutcome> {
        let email = normalize_email(email);

        let Some(user) = self.user_repository.find_by_email(&email).await? else {
            tracing::warn!(email = %email, "Login failed, unknown email");
            return Err(CredentialError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.password_hash).await? {
            tracing::warn!(user_id = %user.id, email = %email, "Login failed, wrong password");
            return Err(CredentialError::InvalidCredentials.into());
        }

        let tokens = self.token_service.issue(&user)?;
        tracing::info!(user_id = %user.id, email = %user.email, "User logged in");

        Ok(AuthOutcome::new(tokens, user))
    }

    /// Exchange a refresh token for a new token pair
    pub async fn refresh(&self, refresh_token: &str) -> DomainResult<TokenPair> {
        self.refresh_at(refresh_token, Utc::now()).await
    }

    /// Exchange a refresh token for a new token pair at an explicit instant
    ///
    /// The user is re-read from the store so the new access token carries
    /// the current role. The new pair is stamped at least one second after
    /// the pair it replaces, so its access token always expires later.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The rotated pair
    /// * `Err(DomainError::RefreshFailed)` - The refresh token was rejected
    ///   or its user no longer exists
    pub async fn refresh_at(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<TokenPair> {
        let grant = self
            .token_service
            .verify_refresh_token_at(refresh_token, now)
            .map_err(|rejection| {
                tracing::info!(reason = rejection.code(), "Refresh token rejected");
                DomainError::refresh_failed(format!("refresh token rejected: {rejection}"))
            })?;

        let user = self
            .user_repository
            .find_by_id(grant.user_id)
            .await?
            .ok_or_else(|| {
                tracing::warn!(user_id = %grant.user_id, "Refresh for unknown user");
                DomainError::refresh_failed("user no longer exists")
            })?;

        let issued_at = now.max(grant.issued_at + Duration::seconds(1));
        let tokens = self.token_service.issue_at(user.id, user.role, issued_at)?;
        tracing::info!(user_id = %user.id, role = %user.role, "Token pair refreshed");

        Ok(tokens)
    }

    /// The user behind a verified identity
    pub async fn me(&self, identity: &Identity) -> DomainResult<User> {
        self.get_user(identity.user_id).await
    }

    /// Get a user by id
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The user
    /// * `Err(DomainError::NotFound)` - No such user
    pub async fn get_user(&self, id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {id}"),
            })
    }

    /// List all users
    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.user_repository.list().await
    }

    /// Change a user's role
    ///
    /// Tokens already issued keep their embedded role until refreshed.
    pub async fn set_role(&self, id: Uuid, role: Role) -> DomainResult<User> {
        let mut user = self.get_user(id).await?;
        if user.role == role {
            return Ok(user);
        }

        let previous = user.role;
        user.set_role(role);
        let user = self.user_repository.update(user).await?;
        tracing::info!(user_id = %id, from = %previous, to = %role, "User role changed");

        Ok(user)
    }
}
