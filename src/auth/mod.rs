//! Token lifecycle.
//!
//! Decides whether the stored access token is stale and exchanges the token
//! pair for a new one. Refreshes are single-flight: concurrent callers that
//! observe the same stale token trigger at most one call to the refresh
//! endpoint, and the later callers reuse the rotated pair.
//!
//! # Example
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use azumuta_sync::auth::{DefaultTokenManager, TokenManager};
//! # async fn example(manager: Arc<DefaultTokenManager>) -> azumuta_sync::SyncResult<()> {
//! if manager.ensure_fresh().await? {
//!     println!("token rotated");
//! }
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::config::DEFAULT_EXPIRY_THRESHOLD;
use crate::errors::{SyncError, SyncResult};
use crate::services::AuthService;
use crate::store::TokenStore;
use crate::types::{RefreshTokenResponse, TokenState};

/// Most fractional-second digits the parser accepts.
const MAX_FRACTION_DIGITS: usize = 6;

/// Token manager interface.
#[async_trait]
pub trait TokenManager: Send + Sync {
    /// True if the stored token expires within the look-ahead window.
    async fn is_expired(&self) -> SyncResult<bool>;

    /// Unconditionally exchange the stored pair for a new one.
    async fn refresh(&self) -> SyncResult<()>;

    /// Number of completed refreshes. Used to detect a rotation by another caller.
    fn generation(&self) -> u64;

    /// Refresh unless another caller already did since `seen` was read.
    ///
    /// Returns true if this call performed the refresh.
    async fn refresh_after(&self, seen: u64) -> SyncResult<bool>;

    /// Refresh if the stored token is expired. Returns true if a refresh ran.
    async fn ensure_fresh(&self) -> SyncResult<bool>;
}

/// Default token manager backed by the configuration store.
pub struct DefaultTokenManager {
    tokens: TokenStore,
    auth: AuthService,
    threshold: Duration,
    refresh_lock: Mutex<()>,
    generation: AtomicU64,
}

impl DefaultTokenManager {
    /// Create a token manager with the default 60 second threshold.
    pub fn new(tokens: TokenStore, auth: AuthService) -> Self {
        Self::with_threshold(tokens, auth, DEFAULT_EXPIRY_THRESHOLD)
    }

    /// Create a token manager with a custom look-ahead window.
    pub fn with_threshold(tokens: TokenStore, auth: AuthService, threshold: Duration) -> Self {
        Self {
            tokens,
            auth,
            threshold,
            refresh_lock: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// The token store this manager reads and writes.
    pub fn token_store(&self) -> &TokenStore {
        &self.tokens
    }

    /// Performs the exchange. Caller must hold `refresh_lock`.
    async fn exchange(&self) -> SyncResult<()> {
        let jwt_token = self.tokens.access_token().await?;
        let refresh_token = self.tokens.refresh_token().await?;

        let response = self.auth.refresh_token(&jwt_token, &refresh_token).await?;
        if response.status != 200 {
            tracing::warn!(status = response.status, "Token refresh rejected");
            return Err(SyncError::unknown(response.status, response.text()));
        }

        let refreshed: RefreshTokenResponse = response.json()?;
        let state = TokenState::from(refreshed);
        self.tokens.save(&state).await?;
        self.generation.fetch_add(1, Ordering::SeqCst);

        tracing::info!(expires_at = %state.expires_at, "Access token refreshed");
        Ok(())
    }
}

#[async_trait]
impl TokenManager for DefaultTokenManager {
    async fn is_expired(&self) -> SyncResult<bool> {
        let expiration = self.tokens.expiration().await?;
        is_expired_at(&expiration, Utc::now(), self.threshold)
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> SyncResult<()> {
        let _guard = self.refresh_lock.lock().await;
        self.exchange().await
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    #[instrument(skip(self))]
    async fn refresh_after(&self, seen: u64) -> SyncResult<bool> {
        let _guard = self.refresh_lock.lock().await;
        if self.generation() != seen {
            tracing::debug!("Token already rotated by another caller");
            return Ok(false);
        }

        self.exchange().await?;
        Ok(true)
    }

    async fn ensure_fresh(&self) -> SyncResult<bool> {
        if !self.is_expired().await? {
            return Ok(false);
        }

        let _guard = self.refresh_lock.lock().await;
        // Re-check: another caller may have refreshed while we waited.
        if !self.is_expired().await? {
            return Ok(false);
        }

        tracing::debug!("Stored token expired, refreshing before request");
        self.exchange().await?;
        Ok(true)
    }
}

impl std::fmt::Debug for DefaultTokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTokenManager")
            .field("threshold", &self.threshold)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

/// Truncates the fractional-second part of a timestamp to six digits.
///
/// Azumuta emits up to seven digits (`2026-10-16T12:00:00.1234567`).
pub fn normalize_fraction(value: &str) -> String {
    let Some(dot) = value.find('.') else {
        return value.to_string();
    };

    let digits = value[dot + 1..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits <= MAX_FRACTION_DIGITS {
        return value.to_string();
    }

    let keep_end = dot + 1 + MAX_FRACTION_DIGITS;
    let drop_end = dot + 1 + digits;
    format!("{}{}", &value[..keep_end], &value[drop_end..])
}

/// Parses an ISO-8601 expiration. Values without an offset are read as UTC.
pub fn parse_expiration(value: &str) -> SyncResult<DateTime<Utc>> {
    let normalized = normalize_fraction(value.trim());

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| SyncError::InvalidExpiration {
            value: value.to_string(),
            message: "not an ISO-8601 timestamp".to_string(),
        })
}

/// True if `expiration` is at or before `now + threshold`.
pub fn is_expired_at(expiration: &str, now: DateTime<Utc>, threshold: Duration) -> SyncResult<bool> {
    let expires_at = parse_expiration(expiration)?;
    let window = chrono::Duration::milliseconds(threshold.as_millis() as i64);
    Ok(expires_at <= now + window)
}
