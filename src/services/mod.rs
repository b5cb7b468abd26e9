//! Azumuta API services.
//!
//! Thin request/response wrappers around the three remote endpoints.

mod auth;
mod employees;

pub use auth::{AuthService, REFRESH_TOKEN_PATH};
pub use employees::{EmployeesService, GET_EMPLOYEES_PATH, SYNC_EMPLOYEES_PATH};

use std::collections::HashMap;

/// Headers sent with every Azumuta request.
pub(crate) fn json_headers() -> HashMap<String, String> {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), "application/json".to_string());
    headers
}
