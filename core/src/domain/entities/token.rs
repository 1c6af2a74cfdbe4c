//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Kind of a signed token, carried in the `typ` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims structure of an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Role at issuance time
    pub role: Role,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Always `TokenKind::Access`
    pub typ: TokenKind,
}

impl AccessClaims {
    /// Creates new claims for an access token
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's UUID
    /// * `role` - The user's role, frozen into the token
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Lifetime of the token
    /// * `issuer` - Value of the `iss` claim
    ///
    /// # Returns
    ///
    /// A new `AccessClaims` instance
    pub fn new(
        user_id: Uuid,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl: Duration,
        issuer: &str,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            iss: issuer.to_string(),
            typ: TokenKind::Access,
        }
    }

    /// Checks if the claims have expired at `now`
    ///
    /// A token is expired from its `exp` instant onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Claims structure of a refresh token
///
/// Carries the identity reference only; the role is re-read from the user
/// store when the token is redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Always `TokenKind::Refresh`
    pub typ: TokenKind,
}

impl RefreshClaims {
    /// Creates new claims for a refresh token
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>, ttl: Duration, issuer: &str) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            iss: issuer.to_string(),
            typ: TokenKind::Refresh,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}

impl From<TokenPair> for sg_shared::RefreshTokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_lifetime() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();
        let claims = AccessClaims::new(
            user_id,
            Role::Admin,
            now,
            Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            "sessiongate",
        );

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.typ, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_EXPIRY_MINUTES * 60);
        assert!(!claims.is_expired_at(now));
        assert!(claims.is_expired_at(now + Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES)));
    }

    #[test]
    fn test_refresh_claims_carry_no_role() {
        let now = Utc::now();
        let claims = RefreshClaims::new(
            Uuid::new_v4(),
            now,
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            "sessiongate",
        );

        let value = serde_json::to_value(&claims).unwrap();
        assert!(value.get("role").is_none());
        assert_eq!(value["typ"], "refresh");
    }

    #[test]
    fn test_access_claims_wire_shape() {
        let claims = AccessClaims::new(
            Uuid::nil(),
            Role::User,
            Utc::now(),
            Duration::minutes(1),
            "sessiongate",
        );

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["role"], "USER");
        assert_eq!(value["typ"], "access");
    }
}
