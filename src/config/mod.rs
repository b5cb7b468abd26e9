//! Configuration module for the Azumuta sync client.
//!
//! Holds the remote base URL, request timeout, and the policy values used by
//! the employee mapper and the token lifecycle.

use std::time::Duration;
use url::Url;

use crate::errors::{SyncError, SyncResult};

/// Default base URL for the Azumuta API, including the versioned prefix.
pub const DEFAULT_BASE_URL: &str = "https://app.azumuta.com/Api/v1";

/// Default request timeout (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default company domain used for generated email addresses.
pub const DEFAULT_EMAIL_DOMAIN: &str = "e-powerinternational.com";

/// Default locale code sent with every employee.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default number of refresh-and-resubmit cycles after a stale-token response.
pub const DEFAULT_MAX_AUTH_RETRIES: u32 = 1;

/// Tokens expiring within this window are treated as expired.
pub const DEFAULT_EXPIRY_THRESHOLD: Duration = Duration::from_secs(60);

/// Configuration for the Azumuta sync client.
#[derive(Debug, Clone)]
pub struct AzumutaConfig {
    /// Base URL for API requests, without trailing slash.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Domain for generated email addresses.
    pub email_domain: String,
    /// Locale code sent as `language`.
    pub default_language: String,
    /// Maximum refresh-and-resubmit cycles on 401.
    pub max_auth_retries: u32,
    /// Expiry look-ahead window.
    pub expiry_threshold: Duration,
}

impl AzumutaConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> AzumutaConfigBuilder {
        AzumutaConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AZUMUTA_BASE_URL` (optional): Custom base URL
    /// - `AZUMUTA_TIMEOUT` (optional): Request timeout in seconds
    /// - `AZUMUTA_EMAIL_DOMAIN` (optional): Domain for generated emails
    /// - `AZUMUTA_LANGUAGE` (optional): Locale code for employees
    /// - `AZUMUTA_MAX_AUTH_RETRIES` (optional): Re-authentication attempts on 401
    pub fn from_env() -> SyncResult<Self> {
        let mut builder = AzumutaConfigBuilder::new();

        if let Ok(base_url) = std::env::var("AZUMUTA_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("AZUMUTA_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        if let Ok(domain) = std::env::var("AZUMUTA_EMAIL_DOMAIN") {
            builder = builder.email_domain(domain);
        }

        if let Ok(language) = std::env::var("AZUMUTA_LANGUAGE") {
            builder = builder.default_language(language);
        }

        if let Ok(retries_str) = std::env::var("AZUMUTA_MAX_AUTH_RETRIES") {
            if let Ok(retries) = retries_str.parse::<u32>() {
                builder = builder.max_auth_retries(retries);
            }
        }

        builder.build()
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for AzumutaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            max_auth_retries: DEFAULT_MAX_AUTH_RETRIES,
            expiry_threshold: DEFAULT_EXPIRY_THRESHOLD,
        }
    }
}

/// Builder for `AzumutaConfig`.
#[derive(Debug, Default)]
pub struct AzumutaConfigBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    email_domain: Option<String>,
    default_language: Option<String>,
    max_auth_retries: Option<u32>,
    expiry_threshold: Option<Duration>,
}

impl AzumutaConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Sets the domain for generated emails.
    pub fn email_domain(mut self, domain: impl Into<String>) -> Self {
        self.email_domain = Some(domain.into());
        self
    }

    /// Sets the locale code sent with employees.
    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    /// Sets the maximum re-authentication attempts on 401.
    pub fn max_auth_retries(mut self, retries: u32) -> Self {
        self.max_auth_retries = Some(retries);
        self
    }

    /// Sets the expiry look-ahead window.
    pub fn expiry_threshold(mut self, threshold: Duration) -> Self {
        self.expiry_threshold = Some(threshold);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> SyncResult<AzumutaConfig> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = Url::parse(&base_url)?;
        let is_loopback = matches!(
            parsed.host_str(),
            Some("localhost") | Some("127.0.0.1") | Some("[::1]")
        );
        if parsed.scheme() != "https" && !(parsed.scheme() == "http" && is_loopback) {
            return Err(SyncError::Configuration {
                message: "Base URL must use HTTPS".to_string(),
            });
        }

        let email_domain = self
            .email_domain
            .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string());
        if email_domain.trim().is_empty() {
            return Err(SyncError::Configuration {
                message: "Email domain cannot be empty".to_string(),
            });
        }

        let default_language = self
            .default_language
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        if default_language.trim().is_empty() {
            return Err(SyncError::Configuration {
                message: "Default language cannot be empty".to_string(),
            });
        }

        Ok(AzumutaConfig {
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            email_domain,
            default_language,
            max_auth_retries: self.max_auth_retries.unwrap_or(DEFAULT_MAX_AUTH_RETRIES),
            expiry_threshold: self.expiry_threshold.unwrap_or(DEFAULT_EXPIRY_THRESHOLD),
        })
    }
}
