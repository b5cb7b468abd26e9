//! Token refresh endpoint.

use secrecy::SecretString;
use std::sync::Arc;
use tracing::instrument;

use crate::errors::SyncResult;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::types::RefreshTokenRequest;

/// Path of the refresh endpoint relative to the base URL.
pub const REFRESH_TOKEN_PATH: &str = "Auth/RefreshToken";

/// Service for the unauthenticated `Auth/RefreshToken` endpoint.
#[derive(Clone)]
pub struct AuthService {
    transport: Arc<dyn HttpTransport>,
}

impl AuthService {
    /// Creates a new auth service.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Exchanges the current token pair for a new one.
    ///
    /// Returns the raw response; status interpretation is left to the caller.
    #[instrument(skip_all)]
    pub async fn refresh_token(
        &self,
        jwt_token: &SecretString,
        refresh_token: &SecretString,
    ) -> SyncResult<HttpResponse> {
        let body = serde_json::to_vec(&RefreshTokenRequest::new(jwt_token, refresh_token))?;

        let request = HttpRequest {
            method: HttpMethod::Post,
            path: REFRESH_TOKEN_PATH.to_string(),
            headers: super::json_headers(),
            body: Some(body),
            timeout: None,
        };

        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, "Refresh endpoint responded");
        Ok(response)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish()
    }
}
