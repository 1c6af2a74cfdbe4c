//! Results of the authentication flows.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sg_shared::AuthResponse;

use crate::domain::entities::{TokenPair, User};

/// Outcome of a successful register or login
///
/// Pairs the freshly issued tokens with the user they were issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    /// Newly issued token pair
    pub tokens: TokenPair,

    /// The authenticated user
    pub user: User,
}

impl AuthOutcome {
    pub fn new(tokens: TokenPair, user: User) -> Self {
        Self { tokens, user }
    }

    /// Converts the outcome into the `{accessToken, refreshToken, user}` body
    pub fn into_response(self) -> AuthResponse {
        AuthResponse {
            user: self.user.to_dto(),
            access_token: self.tokens.access_token,
            refresh_token: self.tokens.refresh_token,
        }
    }
}

/// What a verified refresh token grants: the user it names and when the
/// pair it belongs to was issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshGrant {
    pub user_id: Uuid,
    pub issued_at: DateTime<Utc>,
}
