//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT signing and token lifetimes
//! - `database` - User store connection settings
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

pub use auth::JwtConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// User store configuration; `None` selects the in-memory store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            jwt: JwtConfig::default(),
            database: None,
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            jwt: JwtConfig::from_env(),
            database: DatabaseConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Check the configuration for settings that must not reach production
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.is_empty() {
            return Err("JWT_SECRET must not be empty".to_string());
        }
        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.jwt.access_token_expiry <= 0 || self.jwt.refresh_token_expiry <= 0 {
            return Err("token expiry values must be positive".to_string());
        }
        if self.jwt.access_token_expiry >= self.jwt.refresh_token_expiry {
            tracing::warn!(
                access = self.jwt.access_token_expiry,
                refresh = self.jwt.refresh_token_expiry,
                "Access token lifetime is not shorter than refresh token lifetime"
            );
        }
        Ok(())
    }
}
