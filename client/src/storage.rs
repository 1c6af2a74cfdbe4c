//! Persisted token pair
//!
//! The pair lives under two fixed keys, `accessToken` and `refreshToken`, and
//! is always written and cleared as a whole.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use sg_shared::{AuthResponse, RefreshTokenResponse};

use crate::error::ClientError;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// The token pair as persisted by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl StoredTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl From<RefreshTokenResponse> for StoredTokens {
    fn from(response: RefreshTokenResponse) -> Self {
        Self::new(response.access_token, response.refresh_token)
    }
}

impl From<&AuthResponse> for StoredTokens {
    fn from(response: &AuthResponse) -> Self {
        Self::new(response.access_token.clone(), response.refresh_token.clone())
    }
}

/// Storage for the current token pair
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// The persisted pair, `None` when either key is absent
    async fn load(&self) -> Result<Option<StoredTokens>, ClientError>;

    /// Replaces the persisted pair
    async fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError>;

    /// Removes both keys
    async fn clear(&self) -> Result<(), ClientError>;
}

/// In-process storage, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    entries: RwLock<HashMap<&'static str, String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with a pair
    pub fn with_tokens(tokens: StoredTokens) -> Self {
        let entries = HashMap::from([
            (ACCESS_TOKEN_KEY, tokens.access_token),
            (REFRESH_TOKEN_KEY, tokens.refresh_token),
        ]);
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<Option<StoredTokens>, ClientError> {
        let entries = self.entries.read().await;
        let tokens = match (entries.get(ACCESS_TOKEN_KEY), entries.get(REFRESH_TOKEN_KEY)) {
            (Some(access), Some(refresh)) => Some(StoredTokens::new(access.as_str(), refresh.as_str())),
            _ => None,
        };
        Ok(tokens)
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError> {
        let mut entries = self.entries.write().await;
        entries.insert(ACCESS_TOKEN_KEY, tokens.access_token.clone());
        entries.insert(REFRESH_TOKEN_KEY, tokens.refresh_token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        let mut entries = self.entries.write().await;
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
        Ok(())
    }
}

/// JSON file storage
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a reader never sees half a pair.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<StoredTokens>, ClientError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entries: HashMap<String, String> = serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::Storage(format!("corrupt token file: {e}")))?;

        let tokens = match (entries.get(ACCESS_TOKEN_KEY), entries.get(REFRESH_TOKEN_KEY)) {
            (Some(access), Some(refresh)) => Some(StoredTokens::new(access.as_str(), refresh.as_str())),
            _ => None,
        };
        Ok(tokens)
    }

    async fn save(&self, tokens: &StoredTokens) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        let bytes = serde_json::to_vec(tokens)?;
        tokio::fs::write(&temp, bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        tracing::debug!(path = %self.path.display(), "Token pair persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<(), ClientError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
