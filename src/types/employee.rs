//! Internal employee representation as read from the HR system of record.

use serde::{Deserialize, Serialize};

/// Job position an employee is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Job name, sent as the remote job title.
    pub name: String,
}

impl Job {
    /// Creates a job reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Employee record owned by the host HR system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Free-text full name.
    pub name: String,
    /// Work email, when the HR system has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_email: Option<String>,
    /// Attached job, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

impl Employee {
    /// Creates an employee with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            work_email: None,
            job: None,
        }
    }

    /// Sets the work email.
    pub fn with_work_email(mut self, email: impl Into<String>) -> Self {
        self.work_email = Some(email.into());
        self
    }

    /// Attaches a job.
    pub fn with_job(mut self, job_name: impl Into<String>) -> Self {
        self.job = Some(Job::new(job_name));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_builder() {
        let employee = Employee::new("James Smith")
            .with_work_email("james.smith@example.com")
            .with_job("Welder");

        assert_eq!(employee.name, "James Smith");
        assert_eq!(employee.work_email.as_deref(), Some("james.smith@example.com"));
        assert_eq!(employee.job, Some(Job::new("Welder")));
    }

    #[test]
    fn test_employee_deserialize_without_optionals() {
        let employee: Employee = serde_json::from_str(r#"{"name": "test"}"#).unwrap();
        assert_eq!(employee.name, "test");
        assert!(employee.work_email.is_none());
        assert!(employee.job.is_none());
    }
}
