//! Sync orchestration.
//!
//! Maps a set of HR employees, makes sure the access token is usable, submits
//! the batch and interprets the response. A stale-token response triggers a
//! refresh and a resubmission, bounded by `max_auth_retries`; every other
//! non-success status is terminal.

use std::sync::Arc;
use tracing::instrument;

use crate::auth::TokenManager;
use crate::errors::{SyncError, SyncResult};
use crate::mapping::EmployeeMapper;
use crate::services::EmployeesService;
use crate::types::{Employee, RemoteEmployeeList, SyncStatus};

/// Outcome of a successful sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Number of employees accepted by Azumuta.
    pub synced: usize,
    /// Refresh-and-resubmit cycles caused by stale-token responses.
    pub auth_retries: u32,
    /// Whether this sync rotated the token pair.
    pub refreshed: bool,
}

/// Receives the user-visible success notification.
#[cfg_attr(test, mockall::automock)]
pub trait SyncNotifier: Send + Sync {
    /// Called once per successful sync.
    fn notify_success(&self, report: &SyncReport);
}

/// Notifier that emits the success message as a log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl SyncNotifier for TracingNotifier {
    fn notify_success(&self, report: &SyncReport) {
        tracing::info!(
            synced = report.synced,
            auth_retries = report.auth_retries,
            "Employees successfully synced to Azumuta"
        );
    }
}

/// Drives one employee sync end to end.
pub struct SyncOrchestrator {
    mapper: EmployeeMapper,
    tokens: Arc<dyn TokenManager>,
    employees: EmployeesService,
    notifier: Arc<dyn SyncNotifier>,
    max_auth_retries: u32,
}

impl SyncOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        mapper: EmployeeMapper,
        tokens: Arc<dyn TokenManager>,
        employees: EmployeesService,
        notifier: Arc<dyn SyncNotifier>,
        max_auth_retries: u32,
    ) -> Self {
        Self {
            mapper,
            tokens,
            employees,
            notifier,
            max_auth_retries,
        }
    }

    /// Synchronizes employees to Azumuta.
    ///
    /// Validation runs over the whole input before any network call. An empty
    /// input is a no-op.
    #[instrument(skip(self, employees), fields(count = employees.len()))]
    pub async fn sync(&self, employees: &[Employee]) -> SyncResult<SyncReport> {
        let batch = self.mapper.map_batch(employees)?;
        if batch.is_empty() {
            tracing::debug!("Nothing to sync");
            return Ok(SyncReport::default());
        }

        let mut refreshed = self.tokens.ensure_fresh().await?;
        let mut auth_retries = 0;

        loop {
            let seen = self.tokens.generation();
            let response = self.employees.sync_employees(&batch).await?;

            match SyncStatus::from_code(response.status) {
                SyncStatus::Ok => {
                    let report = SyncReport {
                        synced: batch.len(),
                        auth_retries,
                        refreshed,
                    };
                    self.notifier.notify_success(&report);
                    return Ok(report);
                }
                SyncStatus::BadRequest => {
                    return Err(SyncError::InvalidData {
                        body: response.text(),
                    });
                }
                SyncStatus::ApiKeyExpired => {
                    if auth_retries >= self.max_auth_retries {
                        tracing::warn!(auth_retries, "Access token still rejected after refresh");
                        return Err(SyncError::unknown(response.status, response.text()));
                    }
                    auth_retries += 1;
                    tracing::debug!(auth_retries, "Access token rejected, refreshing");
                    refreshed |= self.tokens.refresh_after(seen).await?;
                }
                SyncStatus::ServiceDown => {
                    return Err(SyncError::ApiUnavailable {
                        body: response.text(),
                    });
                }
                SyncStatus::Other(code) => {
                    return Err(SyncError::unknown(code, response.text()));
                }
            }
        }
    }

    /// Lists the employees Azumuta currently knows.
    pub async fn list_remote_employees(&self) -> SyncResult<RemoteEmployeeList> {
        self.tokens.ensure_fresh().await?;
        self.employees.get_employees().await
    }
}

impl std::fmt::Debug for SyncOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOrchestrator")
            .field("mapper", &self.mapper)
            .field("max_auth_retries", &self.max_auth_retries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::DefaultTokenManager;
    use crate::errors::ErrorKind;
    use crate::mocks::{MockResponse, MockTransport, RecordingNotifier};
    use crate::services::{AuthService, GET_EMPLOYEES_PATH, REFRESH_TOKEN_PATH, SYNC_EMPLOYEES_PATH};
    use crate::store::{
        InMemoryConfigStore, TokenStore, ACCESS_TOKEN_KEY, EXPIRATION_KEY, REFRESH_TOKEN_KEY,
    };
    use chrono::Utc;
    use tokio_test::{assert_err, assert_ok};

    struct Harness {
        transport: Arc<MockTransport>,
        notifier: Arc<RecordingNotifier>,
        orchestrator: SyncOrchestrator,
    }

    fn timestamp_in(seconds: i64) -> String {
        (Utc::now() + chrono::Duration::seconds(seconds))
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string()
    }

    fn harness_with(expiration: &str, max_auth_retries: u32) -> Harness {
        let transport = Arc::new(MockTransport::new());
        let store = Arc::new(InMemoryConfigStore::with_values([
            (ACCESS_TOKEN_KEY, "jwt-1"),
            (REFRESH_TOKEN_KEY, "refresh-1"),
            (EXPIRATION_KEY, expiration),
        ]));
        let tokens = TokenStore::new(store);
        let manager = Arc::new(DefaultTokenManager::new(
            tokens.clone(),
            AuthService::new(transport.clone()),
        ));
        let notifier = Arc::new(RecordingNotifier::new());
        let orchestrator = SyncOrchestrator::new(
            EmployeeMapper::new("e-powerinternational.com", "en"),
            manager,
            EmployeesService::new(transport.clone(), tokens),
            notifier.clone(),
            max_auth_retries,
        );

        Harness {
            transport,
            notifier,
            orchestrator,
        }
    }

    fn harness() -> Harness {
        harness_with(&timestamp_in(3600), 1)
    }

    fn employees() -> Vec<Employee> {
        vec![
            Employee::new("James Smith").with_job("Welder"),
            Employee::new("Anna de Vries")
                .with_work_email("anna@example.org")
                .with_job("Planner"),
        ]
    }

    fn refresh_response() -> MockResponse {
        MockResponse::refresh("jwt-2", &timestamp_in(3600), "refresh-2")
    }

    fn bearer(request: &crate::transport::HttpRequest) -> Option<&str> {
        request.headers.get("Authorization").map(String::as_str)
    }

    #[tokio::test]
    async fn test_success_notifies_once() {
        let h = harness();
        h.transport.queue(SYNC_EMPLOYEES_PATH, MockResponse::status(200, "OK"));

        let report = assert_ok!(h.orchestrator.sync(&employees()).await);
        assert_eq!(report.synced, 2);
        assert_eq!(report.auth_retries, 0);
        assert!(!report.refreshed);

        assert_eq!(h.notifier.count(), 1);
        assert_eq!(h.notifier.notifications()[0], report);
        assert_eq!(h.transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_is_noop() {
        let h = harness();

        let report = assert_ok!(h.orchestrator.sync(&[]).await);
        assert_eq!(report, SyncReport::default());
        assert_eq!(h.transport.request_count(), 0);
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_network_call() {
        let h = harness_with(&timestamp_in(-10), 1);
        let employees = vec![
            Employee::new("James Smith").with_job("Welder"),
            Employee::new("test").with_job("test"),
        ];

        let error = assert_err!(h.orchestrator.sync(&employees).await);
        assert_eq!(error.kind(), ErrorKind::EmailGenerationFailed);
        assert_eq!(h.transport.request_count(), 0);
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_bad_request_is_invalid_data() {
        let h = harness();
        h.transport
            .queue(SYNC_EMPLOYEES_PATH, MockResponse::status(400, "email malformed"));

        let error = assert_err!(h.orchestrator.sync(&employees()).await);
        assert_eq!(error.kind(), ErrorKind::InvalidData);
        assert!(error.to_string().contains("email malformed"));
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_service_down_is_not_retried() {
        let h = harness();
        h.transport
            .set_path_default(SYNC_EMPLOYEES_PATH, MockResponse::status(500, "boom"));

        let error = assert_err!(h.orchestrator.sync(&employees()).await);
        assert_eq!(error.kind(), ErrorKind::ApiUnavailable);
        assert_eq!(h.transport.request_count_for(SYNC_EMPLOYEES_PATH), 1);
        assert_eq!(h.transport.request_count_for(REFRESH_TOKEN_PATH), 0);
    }

    #[tokio::test]
    async fn test_unexpected_status_is_unknown() {
        let h = harness();
        h.transport
            .queue(SYNC_EMPLOYEES_PATH, MockResponse::status(403, "forbidden"));

        let error = assert_err!(h.orchestrator.sync(&employees()).await);
        assert_eq!(error.kind(), ErrorKind::UnknownError);
        assert!(matches!(error, SyncError::Unknown { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_stale_token_refreshes_once_and_resubmits() {
        let h = harness();
        h.transport.queue(SYNC_EMPLOYEES_PATH, MockResponse::status(401, "expired"));
        h.transport.queue(SYNC_EMPLOYEES_PATH, MockResponse::status(200, "OK"));
        h.transport.queue(REFRESH_TOKEN_PATH, refresh_response());

        let report = assert_ok!(h.orchestrator.sync(&employees()).await);
        assert_eq!(report.auth_retries, 1);
        assert!(report.refreshed);
        assert_eq!(h.notifier.count(), 1);

        let paths: Vec<_> = h.transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec![SYNC_EMPLOYEES_PATH, REFRESH_TOKEN_PATH, SYNC_EMPLOYEES_PATH]
        );

        let requests = h.transport.requests();
        assert_eq!(bearer(&requests[0]), Some("Bearer jwt-1"));
        assert_eq!(bearer(&requests[2]), Some("Bearer jwt-2"));
    }

    #[tokio::test]
    async fn test_persistent_stale_token_is_bounded() {
        let h = harness();
        h.transport
            .set_path_default(SYNC_EMPLOYEES_PATH, MockResponse::status(401, "expired"));
        h.transport.set_path_default(REFRESH_TOKEN_PATH, refresh_response());

        let error = assert_err!(h.orchestrator.sync(&employees()).await);
        assert_eq!(error.kind(), ErrorKind::UnknownError);
        assert_eq!(h.transport.request_count_for(SYNC_EMPLOYEES_PATH), 2);
        assert_eq!(h.transport.request_count_for(REFRESH_TOKEN_PATH), 1);
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_retry_cap_is_configurable() {
        let h = harness_with(&timestamp_in(3600), 3);
        h.transport
            .set_path_default(SYNC_EMPLOYEES_PATH, MockResponse::status(401, "expired"));
        h.transport.set_path_default(REFRESH_TOKEN_PATH, refresh_response());

        assert_err!(h.orchestrator.sync(&employees()).await);
        assert_eq!(h.transport.request_count_for(SYNC_EMPLOYEES_PATH), 4);
        assert_eq!(h.transport.request_count_for(REFRESH_TOKEN_PATH), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_fails_on_first_stale_token() {
        let h = harness_with(&timestamp_in(3600), 0);
        h.transport.queue(SYNC_EMPLOYEES_PATH, MockResponse::status(401, "expired"));

        let error = assert_err!(h.orchestrator.sync(&employees()).await);
        assert_eq!(error.kind(), ErrorKind::UnknownError);
        assert_eq!(h.transport.request_count_for(REFRESH_TOKEN_PATH), 0);
    }

    #[tokio::test]
    async fn test_expired_token_refreshed_before_submit() {
        let h = harness_with(&timestamp_in(30), 1);
        h.transport.queue(REFRESH_TOKEN_PATH, refresh_response());
        h.transport.queue(SYNC_EMPLOYEES_PATH, MockResponse::status(200, "OK"));

        let report = assert_ok!(h.orchestrator.sync(&employees()).await);
        assert!(report.refreshed);
        assert_eq!(report.auth_retries, 0);

        let requests = h.transport.requests();
        assert_eq!(requests[0].path, REFRESH_TOKEN_PATH);
        assert_eq!(requests[1].path, SYNC_EMPLOYEES_PATH);
        assert_eq!(bearer(&requests[1]), Some("Bearer jwt-2"));
    }

    #[tokio::test]
    async fn test_failed_preflight_refresh_aborts() {
        let h = harness_with(&timestamp_in(-10), 1);
        h.transport
            .queue(REFRESH_TOKEN_PATH, MockResponse::status(400, "bad refresh token"));

        let error = assert_err!(h.orchestrator.sync(&employees()).await);
        assert_eq!(error.kind(), ErrorKind::UnknownError);
        assert_eq!(h.transport.request_count_for(SYNC_EMPLOYEES_PATH), 0);
    }

    #[tokio::test]
    async fn test_missing_expiration_is_missing_api_token() {
        let transport = Arc::new(MockTransport::new());
        let tokens = TokenStore::new(Arc::new(InMemoryConfigStore::with_values([(
            ACCESS_TOKEN_KEY,
            "jwt-1",
        )])));
        let orchestrator = SyncOrchestrator::new(
            EmployeeMapper::default(),
            Arc::new(DefaultTokenManager::new(
                tokens.clone(),
                AuthService::new(transport.clone()),
            )),
            EmployeesService::new(transport.clone(), tokens),
            Arc::new(TracingNotifier),
            1,
        );

        let error = assert_err!(orchestrator.sync(&employees()).await);
        assert_eq!(error.kind(), ErrorKind::MissingApiToken);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_notifier_receives_report() {
        let transport = Arc::new(MockTransport::new());
        transport.queue(SYNC_EMPLOYEES_PATH, MockResponse::status(200, "OK"));
        let tokens = TokenStore::new(Arc::new(InMemoryConfigStore::with_values([
            (ACCESS_TOKEN_KEY, "jwt-1"),
            (REFRESH_TOKEN_KEY, "refresh-1"),
            (EXPIRATION_KEY, "2999-01-01T00:00:00"),
        ])));

        let mut notifier = MockSyncNotifier::new();
        notifier
            .expect_notify_success()
            .withf(|report| report.synced == 2 && report.auth_retries == 0)
            .times(1)
            .return_const(());

        let orchestrator = SyncOrchestrator::new(
            EmployeeMapper::default(),
            Arc::new(DefaultTokenManager::new(
                tokens.clone(),
                AuthService::new(transport.clone()),
            )),
            EmployeesService::new(transport, tokens),
            Arc::new(notifier),
            1,
        );

        assert_ok!(orchestrator.sync(&employees()).await);
    }

    #[tokio::test]
    async fn test_list_remote_employees() {
        let h = harness();
        h.transport.queue(
            GET_EMPLOYEES_PATH,
            MockResponse::json(&serde_json::json!({
                "employees": [
                    {"email": "James.Smith@e-powerinternational.com", "firstName": "James"},
                    {"email": "anna@example.org"}
                ]
            })),
        );

        let list = assert_ok!(h.orchestrator.list_remote_employees().await);
        assert!(list.contains_email("James.Smith@e-powerinternational.com"));
        assert!(list.contains_email("anna@example.org"));
        assert!(!list.contains_email("someone@else.org"));
    }
}
