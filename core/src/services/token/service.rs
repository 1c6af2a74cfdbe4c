//! Main token service implementation

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::token::{AccessClaims, RefreshClaims, TokenKind, TokenPair};
use crate::domain::entities::user::{Identity, Role, User};
use crate::domain::value_objects::RefreshGrant;
use crate::errors::{DomainError, TokenRejection};

use super::config::TokenServiceConfig;

/// Service for issuing and verifying JWT access/refresh tokens
///
/// Stateless: verification is a pure function of the token, the signing key
/// and the current time.
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// A new `TokenService`, or `DomainError::Signing` when no signing key is
    /// configured
    pub fn new(config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.jwt_secret.is_empty() {
            return Err(DomainError::Signing {
                message: "JWT signing secret is not configured".to_string(),
            });
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        // Expiry is checked against an explicit `now` after decoding, so the
        // library only handles structure, signature and issuer.
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_required_spec_claims::<&str>(&[]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Gets the service configuration
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a new token pair for a user, stamped with the current time
    ///
    /// # Arguments
    ///
    /// * `user` - The authenticated user; its current role is embedded in
    ///   the access token
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The issued pair
    /// * `Err(DomainError::Signing)` - Encoding failed
    pub fn issue(&self, user: &User) -> Result<TokenPair, DomainError> {
        self.issue_at(user.id, user.role, Utc::now())
    }

    /// Issues a new token pair with an explicit issuance instant
    ///
    /// The access token expires `access_token_ttl` after `issued_at`, the
    /// refresh token `refresh_token_ttl` after it.
    pub fn issue_at(
        &self,
        user_id: Uuid,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<TokenPair, DomainError> {
        let access = AccessClaims::new(
            user_id,
            role,
            issued_at,
            self.config.access_token_ttl(),
            &self.config.issuer,
        );
        let refresh = RefreshClaims::new(
            user_id,
            issued_at,
            self.config.refresh_token_ttl(),
            &self.config.issuer,
        );

        let pair = TokenPair::new(self.sign(&access)?, self.sign(&refresh)?);
        tracing::debug!(user_id = %user_id, role = %role, iat = access.iat, "Issued token pair");
        Ok(pair)
    }

    /// Verifies an access token against the current time
    pub fn verify_access_token(&self, token: &str) -> Result<Identity, TokenRejection> {
        self.verify_access_token_at(token, Utc::now())
    }

    /// Verifies an access token
    ///
    /// Steps, in order: structure, signature, expiry, identity. The first
    /// failing step decides the rejection.
    ///
    /// # Arguments
    ///
    /// * `token` - The raw JWT
    /// * `now` - The instant to check expiry against
    ///
    /// # Returns
    ///
    /// * `Ok(Identity)` - The user id and the role embedded at issuance
    /// * `Err(TokenRejection)` - Why the token was refused
    pub fn verify_access_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Identity, TokenRejection> {
        let claims: AccessClaims = self.decode_claims(token)?;

        if claims.typ != TokenKind::Access {
            return Err(TokenRejection::Malformed);
        }
        if claims.is_expired_at(now) {
            return Err(TokenRejection::Expired);
        }

        let user_id = claims.user_id().map_err(|_| TokenRejection::Malformed)?;
        Ok(Identity::new(user_id, claims.role))
    }

    /// Verifies a refresh token against the current time
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshGrant, TokenRejection> {
        self.verify_refresh_token_at(token, Utc::now())
    }

    /// Verifies a refresh token
    ///
    /// Same steps as [`verify_access_token_at`](Self::verify_access_token_at);
    /// an access token presented here is `Malformed`.
    pub fn verify_refresh_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshGrant, TokenRejection> {
        let claims: RefreshClaims = self.decode_claims(token)?;

        if claims.typ != TokenKind::Refresh {
            return Err(TokenRejection::Malformed);
        }
        if claims.is_expired_at(now) {
            return Err(TokenRejection::Expired);
        }

        let user_id = claims.user_id().map_err(|_| TokenRejection::Malformed)?;
        let issued_at = Utc
            .timestamp_opt(claims.iat, 0)
            .single()
            .ok_or(TokenRejection::Malformed)?;

        Ok(RefreshGrant { user_id, issued_at })
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, DomainError> {
        encode(&Header::new(self.config.algorithm), claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            DomainError::Signing {
                message: e.to_string(),
            }
        })
    }

    fn decode_claims<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenRejection> {
        decode::<T>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let rejection = match e.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                        TokenRejection::InvalidSignature
                    }
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    _ => TokenRejection::Malformed,
                };
                tracing::debug!(error = %e, reason = rejection.code(), "Token rejected");
                rejection
            })
    }
}
