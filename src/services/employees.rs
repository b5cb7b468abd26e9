//! Employee list endpoints.

use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing::instrument;

use crate::errors::{SyncError, SyncResult};
use crate::store::TokenStore;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::types::{RemoteEmployeeList, SyncBatch};

/// Path of the batch sync endpoint.
pub const SYNC_EMPLOYEES_PATH: &str = "Employees/SyncEmployeesList";

/// Path of the employee listing endpoint.
pub const GET_EMPLOYEES_PATH: &str = "Employees/GetEmployeesList";

/// Service for the bearer-authenticated employee endpoints.
#[derive(Clone)]
pub struct EmployeesService {
    transport: Arc<dyn HttpTransport>,
    tokens: TokenStore,
}

impl EmployeesService {
    /// Creates a new employees service.
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: TokenStore) -> Self {
        Self { transport, tokens }
    }

    /// Submits a batch. Returns the raw response for status interpretation.
    #[instrument(skip(self, batch), fields(batch_size = batch.len()))]
    pub async fn sync_employees(&self, batch: &SyncBatch) -> SyncResult<HttpResponse> {
        let body = serde_json::to_vec(batch)?;
        let request = self
            .build_request(HttpMethod::Post, SYNC_EMPLOYEES_PATH)
            .await?
            .with_body(body);

        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, "Sync endpoint responded");
        Ok(response)
    }

    /// Lists the employees known to Azumuta.
    #[instrument(skip(self))]
    pub async fn get_employees(&self) -> SyncResult<RemoteEmployeeList> {
        let request = self.build_request(HttpMethod::Get, GET_EMPLOYEES_PATH).await?;
        let response = self.transport.send(request).await?;

        if response.status != 200 {
            return Err(SyncError::unknown(response.status, response.text()));
        }

        Ok(response.json()?)
    }

    /// Builds an authenticated request; the token is read at call time.
    async fn build_request(&self, method: HttpMethod, path: &str) -> SyncResult<HttpRequest> {
        let token = self.tokens.access_token().await?;

        let mut headers = super::json_headers();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", token.expose_secret()),
        );

        Ok(HttpRequest {
            method,
            path: path.to_string(),
            headers,
            body: None,
            timeout: None,
        })
    }
}

impl std::fmt::Debug for EmployeesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeesService").finish()
    }
}
