//! Error types for the Azumuta sync client.
//!
//! Every failure carries technical context for logs, and maps onto exactly one
//! [`ErrorKind`]. The kind is what callers match on; the user-facing text is
//! looked up from the kind and never parsed back.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Closed set of failure categories surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An employee's name is empty.
    InvalidName,
    /// An employee has no job attached.
    NoJob,
    /// No work email and none could be derived from the name.
    EmailGenerationFailed,
    /// The remote service rejected the batch payload.
    InvalidData,
    /// The remote service reported an internal failure.
    ApiUnavailable,
    /// A required credential key is absent from the configuration store.
    MissingApiToken,
    /// Any other non-success condition.
    UnknownError,
}

impl ErrorKind {
    /// Display text shown to the person who triggered the sync.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidName => "An employee has an invalid employee name.",
            ErrorKind::NoJob => "An employee has no job attached to him.",
            ErrorKind::EmailGenerationFailed => {
                "Due to a missing work email, we tried generating an email based on \
                 first/last name for Azumuta but failed to do so."
            }
            ErrorKind::InvalidData => {
                "There is an issue with the data of one of the employees. Please fix."
            }
            ErrorKind::ApiUnavailable => {
                "The Azumuta API appears to be down. Please try again later."
            }
            ErrorKind::MissingApiToken => {
                "The Azumuta API credentials are not configured. Please contact your administrator."
            }
            ErrorKind::UnknownError => {
                "An unknown error occurred while communicating with Azumuta."
            }
        }
    }

    /// Returns true for failures raised while mapping, before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ErrorKind::InvalidName | ErrorKind::NoJob | ErrorKind::EmailGenerationFailed
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::InvalidName => "INVALID_NAME",
            ErrorKind::NoJob => "NO_JOB",
            ErrorKind::EmailGenerationFailed => "EMAIL_GENERATION_FAILED",
            ErrorKind::InvalidData => "INVALID_DATA",
            ErrorKind::ApiUnavailable => "API_UNAVAILABLE",
            ErrorKind::MissingApiToken => "MISSING_API_TOKEN",
            ErrorKind::UnknownError => "UNKNOWN_ERROR",
        };
        f.write_str(name)
    }
}

/// Error type for all sync client operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Employee at `index` has an empty name.
    #[error("Employee at position {index} has an empty name")]
    InvalidName {
        /// Position of the employee in the input batch.
        index: usize,
    },

    /// Employee has no job reference.
    #[error("Employee '{name}' has no job")]
    NoJob {
        /// Employee name.
        name: String,
    },

    /// Email could not be derived from the employee name.
    #[error("Cannot generate an email for employee '{name}': {reason}")]
    EmailGenerationFailed {
        /// Employee name.
        name: String,
        /// Why derivation failed.
        reason: String,
    },

    /// Remote service answered 400.
    #[error("Azumuta rejected the employee data: {body}")]
    InvalidData {
        /// Raw response body.
        body: String,
    },

    /// Remote service answered 500.
    #[error("Azumuta service unavailable: {body}")]
    ApiUnavailable {
        /// Raw response body.
        body: String,
    },

    /// Credential key missing from the configuration store.
    #[error("Missing configuration value for '{key}'")]
    MissingApiToken {
        /// Configuration key that was absent.
        key: String,
    },

    /// Stored expiration could not be parsed.
    #[error("Invalid token expiration '{value}': {message}")]
    InvalidExpiration {
        /// Raw stored value.
        value: String,
        /// Parser message.
        message: String,
    },

    /// Unexpected status code or other remote failure.
    #[error("Unexpected Azumuta response (HTTP {status}): {message}")]
    Unknown {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Transport-level failure.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Configuration store failure.
    #[error("Configuration store error: {message}")]
    Storage {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },
}

impl SyncError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::InvalidName { .. } => ErrorKind::InvalidName,
            SyncError::NoJob { .. } => ErrorKind::NoJob,
            SyncError::EmailGenerationFailed { .. } => ErrorKind::EmailGenerationFailed,
            SyncError::InvalidData { .. } => ErrorKind::InvalidData,
            SyncError::ApiUnavailable { .. } => ErrorKind::ApiUnavailable,
            SyncError::MissingApiToken { .. } => ErrorKind::MissingApiToken,
            SyncError::InvalidExpiration { .. }
            | SyncError::Unknown { .. }
            | SyncError::Transport(_)
            | SyncError::Storage { .. }
            | SyncError::Serialization { .. }
            | SyncError::Configuration { .. } => ErrorKind::UnknownError,
        }
    }

    /// Returns the user-facing message for this error.
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }

    /// Creates a missing token error for a configuration key.
    pub fn missing_token(key: impl Into<String>) -> Self {
        SyncError::MissingApiToken { key: key.into() }
    }

    /// Creates an unknown error from a status code and message.
    pub fn unknown(status: u16, message: impl Into<String>) -> Self {
        SyncError::Unknown {
            status,
            message: message.into(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        SyncError::Storage {
            message: message.into(),
        }
    }
}

/// Transport error types.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection error.
    #[error("Connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Timeout error.
    #[error("Timeout after {timeout:?}")]
    Timeout {
        /// Timeout duration.
        timeout: Duration,
    },

    /// Invalid response.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Error message.
        message: String,
    },
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Storage {
            message: err.to_string(),
        }
    }
}
