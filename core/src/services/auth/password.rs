//! Password hashing with bcrypt
//!
//! bcrypt is CPU-bound, so both operations run on the blocking pool.

use crate::errors::DomainError;

/// Hash a password with the given bcrypt cost
pub async fn hash_password(password: &str, cost: u32) -> Result<String, DomainError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("password hashing task failed: {e}"),
        })?
        .map_err(|e| DomainError::Internal {
            message: format!("password hashing failed: {e}"),
        })
}

/// Check a password against a stored bcrypt hash
///
/// A hash that cannot be parsed counts as a mismatch.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, DomainError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    let result = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| DomainError::Internal {
            message: format!("password verification task failed: {e}"),
        })?;

    match result {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash could not be parsed");
            Ok(false)
        }
    }
}
