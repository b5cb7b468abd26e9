//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::collections::HashMap;
use std::time::Duration;
use tracing::instrument;

use crate::errors::TransportError;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET request.
    Get,
    /// POST request.
    Post,
}

/// HTTP request representation.
#[derive(Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path relative to the base URL.
    pub path: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request timeout override.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Creates a new GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Creates a new POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    /// Sets the request body.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let headers: HashMap<&str, &str> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &headers)
            .field("body_len", &self.body.as_ref().map(Vec::len))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true if the status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// HTTP transport trait.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send an HTTP request.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// HTTP transport implementation using reqwest.
pub struct HttpTransportImpl {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransportImpl {
    /// Creates a new HTTP transport.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| TransportError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Builds the full URL for a path.
    fn build_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl HttpTransport for HttpTransportImpl {
    #[instrument(skip(self, request), fields(method = ?request.method, path = %request.path))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.build_url(&request.path);
        let timeout = request.timeout.unwrap_or(self.timeout);

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout { timeout }
            } else if e.is_connect() {
                TransportError::Connection {
                    message: e.to_string(),
                }
            } else {
                TransportError::InvalidResponse {
                    message: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    v.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                message: e.to_string(),
            })?
            .to_vec();

        tracing::debug!(status, bytes = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for HttpTransportImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransportImpl")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builders() {
        let request = HttpRequest::post("Auth/RefreshToken")
            .with_header("Content-Type", "application/json")
            .with_body(b"{}".to_vec())
            .with_timeout(Duration::from_secs(5));

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.path, "Auth/RefreshToken");
        assert_eq!(
            request.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
        assert_eq!(request.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_debug_redacts_authorization() {
        let request = HttpRequest::get("Employees/GetEmployeesList")
            .with_header("Authorization", "Bearer secret-jwt");

        let debug_str = format!("{:?}", request);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret-jwt"));
    }

    #[test]
    fn test_build_url_joins_segments() {
        let transport =
            HttpTransportImpl::new("https://app.azumuta.com/Api/v1/", Duration::from_secs(5))
                .unwrap();

        assert_eq!(
            transport.build_url("/Employees/GetEmployeesList"),
            "https://app.azumuta.com/Api/v1/Employees/GetEmployeesList"
        );
    }

    #[test]
    fn test_response_helpers() {
        let response = HttpResponse {
            status: 204,
            headers: HashMap::new(),
            body: br#"{"employees": []}"#.to_vec(),
        };

        assert!(response.is_success());
        assert_eq!(response.text(), r#"{"employees": []}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert!(value["employees"].as_array().unwrap().is_empty());
    }
}
