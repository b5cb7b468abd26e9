//! Employee mapping.
//!
//! Converts HR employee records into the Azumuta employee schema. Mapping is
//! all-or-nothing: the first invalid record, in input order, fails the batch.

use crate::config::AzumutaConfig;
use crate::errors::{SyncError, SyncResult};
use crate::types::{Employee, RemoteEmployee, SyncBatch};

/// Split of a full name into the remote first/last name fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameParts {
    /// First whitespace-separated token.
    pub first: String,
    /// Remaining tokens joined without separator.
    pub rest: String,
    /// Number of tokens in the name.
    pub token_count: usize,
}

/// Splits a name on whitespace.
///
/// Both the email fallback and the first/last name fields are derived from
/// this one tokenization.
pub fn split_name(name: &str) -> NameParts {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().unwrap_or_default().to_string();
    let mut rest = String::new();
    let mut token_count = usize::from(!first.is_empty());
    for token in tokens {
        rest.push_str(token);
        token_count += 1;
    }

    NameParts {
        first,
        rest,
        token_count,
    }
}

/// Derives `{first}.{rest}@{domain}` from a name with at least two tokens.
pub fn derive_email(name: &str, domain: &str) -> SyncResult<String> {
    let parts = split_name(name);
    if parts.token_count < 2 {
        return Err(SyncError::EmailGenerationFailed {
            name: name.to_string(),
            reason: "name needs a first and a last name".to_string(),
        });
    }

    let domain = domain.trim().trim_start_matches('@');
    if domain.is_empty() {
        return Err(SyncError::EmailGenerationFailed {
            name: name.to_string(),
            reason: "no email domain configured".to_string(),
        });
    }

    Ok(format!("{}.{}@{}", parts.first, parts.rest, domain))
}

/// Maps HR employees to Azumuta employees.
#[derive(Debug, Clone)]
pub struct EmployeeMapper {
    email_domain: String,
    language: String,
}

impl EmployeeMapper {
    /// Creates a mapper with a company email domain and locale code.
    pub fn new(email_domain: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            email_domain: email_domain.into(),
            language: language.into(),
        }
    }

    /// Creates a mapper from client configuration.
    pub fn from_config(config: &AzumutaConfig) -> Self {
        Self::new(&config.email_domain, &config.default_language)
    }

    /// Maps one employee. `index` is its position in the batch, used in errors.
    pub fn map_employee(&self, index: usize, employee: &Employee) -> SyncResult<RemoteEmployee> {
        let name = employee.name.trim();
        if name.is_empty() {
            return Err(SyncError::InvalidName { index });
        }

        let job_title = match &employee.job {
            Some(job) => job.name.clone(),
            None => {
                return Err(SyncError::NoJob {
                    name: name.to_string(),
                })
            }
        };

        let email = match employee.work_email.as_deref() {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => derive_email(name, &self.email_domain)?,
        };

        let parts = split_name(name);

        Ok(RemoteEmployee {
            first_name: parts.first,
            last_name: parts.rest,
            email,
            language: self.language.clone(),
            job_title,
        })
    }

    /// Maps a batch, failing on the first invalid employee.
    pub fn map_batch(&self, employees: &[Employee]) -> SyncResult<SyncBatch> {
        let mapped = employees
            .iter()
            .enumerate()
            .map(|(index, employee)| self.map_employee(index, employee))
            .collect::<SyncResult<Vec<_>>>()?;

        Ok(SyncBatch::new(mapped))
    }
}

impl Default for EmployeeMapper {
    fn default() -> Self {
        Self::from_config(&AzumutaConfig::default())
    }
}
