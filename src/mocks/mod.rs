//! Mock implementations for testing.
//!
//! Provides a mock transport and a recording notifier for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::errors::TransportError;
use crate::sync::{SyncNotifier, SyncReport};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates a plain-text response with a status.
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    /// Creates a successful refresh response.
    pub fn refresh(token: &str, expiration: &str, refresh_token: &str) -> Self {
        Self::json(&serde_json::json!({
            "token": token,
            "expiration": expiration,
            "refreshToken": refresh_token,
        }))
    }

    /// Replaces the status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }
}

/// Mock HTTP transport with per-path response queues.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    defaults: Mutex<HashMap<String, MockResponse>>,
    fallback: Mutex<Option<MockResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for a path. Queued responses are returned in order.
    pub fn queue(&self, path: &str, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    /// Sets the response for a path once its queue is drained.
    pub fn set_path_default(&self, path: &str, response: MockResponse) {
        self.defaults
            .lock()
            .unwrap()
            .insert(path.to_string(), response);
    }

    /// Sets the response for any path without a queued or path default.
    pub fn set_default(&self, response: MockResponse) {
        *self.fallback.lock().unwrap() = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Returns the number of requests made to a path.
    pub fn request_count_for(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    fn next_response(&self, path: &str) -> Option<MockResponse> {
        if let Some(response) = self
            .responses
            .lock()
            .unwrap()
            .get_mut(path)
            .and_then(VecDeque::pop_front)
        {
            return Some(response);
        }

        if let Some(response) = self.defaults.lock().unwrap().get(path).cloned() {
            return Some(response);
        }

        self.fallback.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = request.path.clone();
        self.requests.lock().unwrap().push(request);

        let response = self
            .next_response(&path)
            .ok_or_else(|| TransportError::Connection {
                message: format!("No mock response configured for {}", path),
            })?;

        Ok(HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}

/// Notifier that records every success notification.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<SyncReport>>,
}

impl RecordingNotifier {
    /// Creates a new recording notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded notifications.
    pub fn notifications(&self) -> Vec<SyncReport> {
        self.notifications.lock().unwrap().clone()
    }

    /// Returns the number of notifications.
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }
}

impl SyncNotifier for RecordingNotifier {
    fn notify_success(&self, report: &SyncReport) {
        self.notifications.lock().unwrap().push(report.clone());
    }
}
