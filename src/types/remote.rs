//! Remote employee schema and request/response bodies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Employee as accepted by the Azumuta `SyncEmployeesList` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEmployee {
    /// First whitespace-separated token of the name.
    pub first_name: String,
    /// Remaining name tokens concatenated.
    pub last_name: String,
    /// Work email or derived address.
    pub email: String,
    /// Locale code.
    pub language: String,
    /// Job name.
    pub job_title: String,
}

/// Ordered batch of mapped employees for one sync call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncBatch {
    /// Mapped employees in input order.
    pub employees: Vec<RemoteEmployee>,
}

impl SyncBatch {
    /// Creates a batch from mapped employees.
    pub fn new(employees: Vec<RemoteEmployee>) -> Self {
        Self { employees }
    }

    /// Number of employees in the batch.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Returns true if the batch holds no employees.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

/// Employee entry returned by `GetEmployeesList`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteEmployeeRecord {
    /// Email address; the identity used for verification.
    pub email: String,
    /// First name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Job title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Fields not modelled here.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Response body of `GetEmployeesList`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RemoteEmployeeList {
    /// Employees known to Azumuta.
    #[serde(default)]
    pub employees: Vec<RemoteEmployeeRecord>,
}

impl RemoteEmployeeList {
    /// Returns true if an employee with this email exists remotely.
    pub fn contains_email(&self, email: &str) -> bool {
        self.employees.iter().any(|e| e.email == email)
    }

    /// Iterates over the remote email addresses.
    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.employees.iter().map(|e| e.email.as_str())
    }
}
