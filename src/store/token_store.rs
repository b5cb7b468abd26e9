//! Typed access to the three persisted credential keys.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::ConfigStore;
use crate::errors::{SyncError, SyncResult};
use crate::types::TokenState;

/// Configuration key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "azumuta.api.jwt_token";

/// Configuration key of the access token expiration.
pub const EXPIRATION_KEY: &str = "azumuta.api.jwt_expiration";

/// Configuration key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "azumuta.api.refresh_token";

/// Token store backed by the host configuration store.
#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn ConfigStore>,
}

impl TokenStore {
    /// Create a token store over a configuration store.
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self { store }
    }

    /// Current access token.
    pub async fn access_token(&self) -> SyncResult<SecretString> {
        self.require(ACCESS_TOKEN_KEY).await.map(SecretString::new)
    }

    /// Current refresh token.
    pub async fn refresh_token(&self) -> SyncResult<SecretString> {
        self.require(REFRESH_TOKEN_KEY).await.map(SecretString::new)
    }

    /// Raw expiration timestamp.
    pub async fn expiration(&self) -> SyncResult<String> {
        self.require(EXPIRATION_KEY).await
    }

    /// Persist a new token triple in one commit.
    pub async fn save(&self, state: &TokenState) -> SyncResult<()> {
        self.store
            .set_many(&[
                (ACCESS_TOKEN_KEY, state.access_token.expose_secret()),
                (EXPIRATION_KEY, state.expires_at.as_str()),
                (REFRESH_TOKEN_KEY, state.refresh_token.expose_secret()),
            ])
            .await
    }

    async fn require(&self, key: &str) -> SyncResult<String> {
        match self.store.get(key).await? {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(SyncError::missing_token(key)),
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}
