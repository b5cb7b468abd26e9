//! Azumuta sync client.
//!
//! Wires configuration, transport, the host configuration store and the
//! success notifier into one entry point.

use std::sync::Arc;

use crate::auth::{DefaultTokenManager, TokenManager};
use crate::config::{AzumutaConfig, AzumutaConfigBuilder};
use crate::errors::{SyncError, SyncResult};
use crate::mapping::EmployeeMapper;
use crate::services::{AuthService, EmployeesService};
use crate::store::{ConfigStore, TokenStore};
use crate::sync::{SyncNotifier, SyncOrchestrator, SyncReport, TracingNotifier};
use crate::transport::{HttpTransport, HttpTransportImpl};
use crate::types::{Employee, RemoteEmployeeList};

/// The main Azumuta sync client.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use azumuta_sync::{AzumutaSyncClient, Employee, FileConfigStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileConfigStore::open("azumuta.json").await?;
///     let client = AzumutaSyncClient::builder()
///         .config_store(Arc::new(store))
///         .build()?;
///
///     let employees = vec![Employee::new("James Smith").with_job("Welder")];
///     let report = client.sync_employees(&employees).await?;
///     println!("synced {}", report.synced);
///     Ok(())
/// }
/// ```
pub struct AzumutaSyncClient {
    config: AzumutaConfig,
    token_store: TokenStore,
    token_manager: Arc<DefaultTokenManager>,
    orchestrator: SyncOrchestrator,
}

impl AzumutaSyncClient {
    /// Creates a new client builder.
    pub fn builder() -> AzumutaSyncClientBuilder {
        AzumutaSyncClientBuilder::new()
    }

    /// Creates a client from `AZUMUTA_*` environment variables over a host store.
    pub fn from_env(config_store: Arc<dyn ConfigStore>) -> SyncResult<Self> {
        AzumutaSyncClientBuilder::from_env()?
            .config_store(config_store)
            .build()
    }

    /// Synchronizes employees. See [`SyncOrchestrator::sync`].
    pub async fn sync_employees(&self, employees: &[Employee]) -> SyncResult<SyncReport> {
        self.orchestrator.sync(employees).await
    }

    /// Lists the employees Azumuta currently knows.
    pub async fn list_remote_employees(&self) -> SyncResult<RemoteEmployeeList> {
        self.orchestrator.list_remote_employees().await
    }

    /// Returns the token manager.
    pub fn token_manager(&self) -> &DefaultTokenManager {
        &self.token_manager
    }

    /// Returns the token store.
    pub fn token_store(&self) -> &TokenStore {
        &self.token_store
    }

    /// Returns the configuration.
    pub fn config(&self) -> &AzumutaConfig {
        &self.config
    }
}

impl std::fmt::Debug for AzumutaSyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzumutaSyncClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Azumuta sync client.
pub struct AzumutaSyncClientBuilder {
    config_builder: AzumutaConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    config_store: Option<Arc<dyn ConfigStore>>,
    notifier: Option<Arc<dyn SyncNotifier>>,
}

impl AzumutaSyncClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::from_config(AzumutaConfig::default())
    }

    /// Creates a builder seeded from environment variables.
    pub fn from_env() -> SyncResult<Self> {
        Ok(Self::from_config(AzumutaConfig::from_env()?))
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: AzumutaConfig) -> Self {
        Self {
            config_builder: AzumutaConfigBuilder::new()
                .base_url(config.base_url)
                .timeout(config.timeout)
                .email_domain(config.email_domain)
                .default_language(config.default_language)
                .max_auth_retries(config.max_auth_retries)
                .expiry_threshold(config.expiry_threshold),
            transport: None,
            config_store: None,
            notifier: None,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the domain for generated emails.
    pub fn email_domain(mut self, domain: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.email_domain(domain);
        self
    }

    /// Sets the locale code sent with employees.
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.default_language(language);
        self
    }

    /// Sets the maximum re-authentication attempts on 401.
    pub fn max_auth_retries(mut self, retries: u32) -> Self {
        self.config_builder = self.config_builder.max_auth_retries(retries);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the host configuration store holding the credentials. Required.
    pub fn config_store(mut self, store: Arc<dyn ConfigStore>) -> Self {
        self.config_store = Some(store);
        self
    }

    /// Sets the success notifier. Defaults to [`TracingNotifier`].
    pub fn notifier(mut self, notifier: Arc<dyn SyncNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Builds the client.
    pub fn build(self) -> SyncResult<AzumutaSyncClient> {
        let config = self.config_builder.build()?;

        let config_store = self.config_store.ok_or_else(|| SyncError::Configuration {
            message: "A configuration store is required".to_string(),
        })?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout).map_err(|e| {
                    SyncError::Configuration {
                        message: e.to_string(),
                    }
                })?,
            ),
        };

        let notifier: Arc<dyn SyncNotifier> =
            self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier));

        let token_store = TokenStore::new(config_store);
        let token_manager = Arc::new(DefaultTokenManager::with_threshold(
            token_store.clone(),
            AuthService::new(Arc::clone(&transport)),
            config.expiry_threshold,
        ));

        let orchestrator = SyncOrchestrator::new(
            EmployeeMapper::from_config(&config),
            Arc::clone(&token_manager) as Arc<dyn TokenManager>,
            EmployeesService::new(Arc::clone(&transport), token_store.clone()),
            notifier,
            config.max_auth_retries,
        );

        Ok(AzumutaSyncClient {
            config,
            token_store,
            token_manager,
            orchestrator,
        })
    }
}

impl Default for AzumutaSyncClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockResponse, MockTransport, RecordingNotifier};
    use crate::services::SYNC_EMPLOYEES_PATH;
    use crate::store::{InMemoryConfigStore, ACCESS_TOKEN_KEY, EXPIRATION_KEY, REFRESH_TOKEN_KEY};

    fn store() -> Arc<InMemoryConfigStore> {
        Arc::new(InMemoryConfigStore::with_values([
            (ACCESS_TOKEN_KEY, "jwt-1"),
            (REFRESH_TOKEN_KEY, "refresh-1"),
            (EXPIRATION_KEY, "2999-01-01T00:00:00"),
        ]))
    }

    #[test]
    fn test_builder_requires_config_store() {
        let result = AzumutaSyncClientBuilder::new().build();
        assert!(matches!(result, Err(SyncError::Configuration { .. })));
    }

    #[test]
    fn test_builder_with_config_store() {
        let client = AzumutaSyncClient::builder()
            .config_store(store())
            .email_domain("example.com")
            .max_auth_retries(2)
            .build()
            .unwrap();

        assert_eq!(client.config().email_domain, "example.com");
        assert_eq!(client.config().max_auth_retries, 2);
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = AzumutaSyncClient::builder()
            .config_store(store())
            .base_url("http://azumuta.example.com")
            .build();
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_client_syncs_with_custom_transport_and_notifier() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(SYNC_EMPLOYEES_PATH, MockResponse::status(200, "OK"));
        let notifier = Arc::new(RecordingNotifier::new());

        let client = AzumutaSyncClient::builder()
            .config_store(store())
            .transport(transport.clone())
            .notifier(notifier.clone())
            .build()
            .unwrap();

        let employees = vec![Employee::new("James Smith").with_job("Welder")];
        let report = client.sync_employees(&employees).await.unwrap();

        assert_eq!(report.synced, 1);
        assert_eq!(notifier.count(), 1);
        assert_eq!(transport.request_count(), 1);
        assert!(!client.token_manager().is_expired().await.unwrap());
    }
}
