//! Session manager implementation

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::watch;

use sg_shared::{LoginRequest, RegisterRequest, UserDto};

use crate::api::AuthApi;
use crate::error::{ClientError, RejectionReason};
use crate::storage::{StoredTokens, TokenStorage};

use super::state::SessionState;

type RefreshFuture = Shared<BoxFuture<'static, Result<StoredTokens, ClientError>>>;

/// Owner of the client session
///
/// Cheap to clone; clones share one session. Every state transition goes
/// through this type and is published on the [`subscribe`](Self::subscribe)
/// channel.
pub struct SessionManager<A: AuthApi, S: TokenStorage> {
    inner: Arc<Inner<A, S>>,
}

struct Inner<A, S> {
    api: A,
    storage: S,
    state: watch::Sender<SessionState>,
    /// Refresh currently in flight, shared by concurrent callers
    refresh_in_flight: Mutex<Option<RefreshFuture>>,
}

impl<A: AuthApi, S: TokenStorage> Clone for SessionManager<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S> SessionManager<A, S>
where
    A: AuthApi + 'static,
    S: TokenStorage + 'static,
{
    /// Create a session in the `Unknown` state
    ///
    /// # Arguments
    ///
    /// * `api` - Server calls
    /// * `storage` - Where the token pair is persisted
    pub fn new(api: A, storage: S) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            inner: Arc::new(Inner {
                api,
                storage,
                state,
                refresh_in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn storage(&self) -> &S {
        &self.inner.storage
    }

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserDto> {
        self.inner.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading()
    }

    /// Receiver notified on every state transition
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Startup check
    ///
    /// Restores the session from the persisted pair:
    /// 1. No persisted pair ends `LoggedOut`
    /// 2. The access token is used to fetch the current user
    /// 3. An expired access token is refreshed once and the fetch retried
    /// 4. Any other failure clears the pair and ends `LoggedOut`
    ///
    /// # Returns
    ///
    /// The state the session ended in
    pub async fn initialize(&self) -> SessionState {
        let tokens = match self.inner.storage.load().await {
            Ok(Some(tokens)) => tokens,
            Ok(None) => {
                tracing::debug!("No persisted session");
                self.inner.set_state(SessionState::LoggedOut);
                return self.state();
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read persisted session");
                self.inner.end_session().await;
                return self.state();
            }
        };

        let user = match self.inner.api.me(&tokens.access_token).await {
            Ok(user) => Ok(user),
            Err(err) if err.is_expired_token() => {
                tracing::debug!("Persisted access token expired, refreshing");
                match self.refresh().await {
                    Ok(tokens) => self.inner.api.me(&tokens.access_token).await,
                    Err(err) => Err(err),
                }
            }
            Err(err) => Err(err),
        };

        match user {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                self.inner.set_state(SessionState::LoggedIn(user));
            }
            Err(err) => {
                tracing::info!(error = %err, "Persisted session is no longer valid");
                self.inner.end_session().await;
            }
        }

        self.state()
    }

    /// Log in and persist the returned pair
    ///
    /// A failure leaves the session untouched.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserDto, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.inner.api.login(&request).await?;

        self.inner.storage.save(&StoredTokens::from(&response)).await?;
        tracing::info!(user_id = %response.user.id, "Logged in");
        self.inner.set_state(SessionState::LoggedIn(response.user.clone()));

        Ok(response.user)
    }

    /// Register, then behave like a successful login
    pub async fn register(&self, email: &str, password: &str) -> Result<UserDto, ClientError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.inner.api.register(&request).await?;

        self.inner.storage.save(&StoredTokens::from(&response)).await?;
        tracing::info!(user_id = %response.user.id, "Registered");
        self.inner.set_state(SessionState::LoggedIn(response.user.clone()));

        Ok(response.user)
    }

    /// End the session without contacting the server
    ///
    /// The state is `LoggedOut` afterwards even when clearing storage fails.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let cleared = self.inner.storage.clear().await;
        self.inner.set_state(SessionState::LoggedOut);
        tracing::info!("Logged out");
        cleared
    }

    /// Exchange the persisted refresh token for a new pair
    ///
    /// Concurrent calls share one request and all observe its result. On
    /// failure the pair is cleared, the session becomes `LoggedOut`, and the
    /// failure is returned.
    pub async fn refresh(&self) -> Result<StoredTokens, ClientError> {
        let in_flight = {
            let mut slot = self
                .inner
                .refresh_in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            match slot.as_ref() {
                Some(in_flight) => in_flight.clone(),
                None => {
                    let inner = Arc::clone(&self.inner);
                    let refresh = async move { inner.run_refresh().await }.boxed().shared();
                    *slot = Some(refresh.clone());
                    refresh
                }
            }
        };

        in_flight.await
    }

    /// Run a request with the current access token
    ///
    /// An expired token is refreshed once and the request retried. Any other
    /// token rejection ends the session. `Forbidden` and other failures are
    /// returned as they are.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let users = session
    ///     .authorized(|token| async move { api.list_users(&token).await })
    ///     .await?;
    /// ```
    pub async fn authorized<T, F, Fut>(&self, request: F) -> Result<T, ClientError>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let Some(tokens) = self.inner.storage.load().await? else {
            self.inner.end_session().await;
            return Err(ClientError::TokenRejected(RejectionReason::Missing));
        };

        let result = match request(tokens.access_token).await {
            Err(err) if err.is_expired_token() => {
                tracing::debug!("Access token expired, refreshing before retry");
                let tokens = self.refresh().await?;
                request(tokens.access_token).await
            }
            other => other,
        };

        if let Err(ClientError::TokenRejected(reason)) = &result {
            tracing::info!(reason = %reason, "Access token rejected, ending session");
            self.inner.end_session().await;
        }

        result
    }
}

impl<A: AuthApi, S: TokenStorage> Inner<A, S> {
    fn set_state(&self, state: SessionState) {
        self.state.send_replace(state);
    }

    /// Clear the persisted pair and publish `LoggedOut`
    async fn end_session(&self) {
        if let Err(err) = self.storage.clear().await {
            tracing::warn!(error = %err, "Failed to clear persisted tokens");
        }
        self.set_state(SessionState::LoggedOut);
    }

    async fn run_refresh(&self) -> Result<StoredTokens, ClientError> {
        let result = self.refresh_once().await;

        match &result {
            Ok(_) => tracing::debug!("Token pair refreshed"),
            Err(err) => {
                tracing::info!(error = %err, "Refresh failed, ending session");
                self.end_session().await;
            }
        }

        *self
            .refresh_in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;

        result
    }

    async fn refresh_once(&self) -> Result<StoredTokens, ClientError> {
        let Some(current) = self.storage.load().await? else {
            return Err(ClientError::RefreshFailed(
                "no refresh token stored".to_string(),
            ));
        };

        let tokens = StoredTokens::from(self.api.refresh(&current.refresh_token).await?);
        self.storage.save(&tokens).await?;

        Ok(tokens)
    }
}
