//! Azumuta Employee Sync
//!
//! Pushes employee records from an HR system of record into the Azumuta
//! training platform. The crate validates and maps employees into Azumuta's
//! schema, keeps the shared API token pair fresh, submits batches and turns
//! every outcome into one typed result.
//!
//! # Features
//!
//! - **Mapping**: name, job and email rules with derived company addresses
//! - **Token lifecycle**: expiry look-ahead and single-flight refresh
//! - **Bounded re-authentication**: a stale-token response triggers at most
//!   `max_auth_retries` refresh-and-resubmit cycles
//! - **Typed errors**: a closed [`ErrorKind`] with user-facing messages
//! - **Observability**: `tracing` spans and events throughout
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use azumuta_sync::{AzumutaSyncClient, Employee, InMemoryConfigStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryConfigStore::with_values([
//!         ("azumuta.api.jwt_token", "eyJ..."),
//!         ("azumuta.api.refresh_token", "r3fr3sh"),
//!         ("azumuta.api.jwt_expiration", "2026-10-16T12:00:00.1234567"),
//!     ]);
//!
//!     let client = AzumutaSyncClient::builder()
//!         .config_store(Arc::new(store))
//!         .build()?;
//!
//!     let employees = vec![
//!         Employee::new("James Smith").with_job("Welder"),
//!         Employee::new("Anna de Vries")
//!             .with_work_email("anna@example.org")
//!             .with_job("Planner"),
//!     ];
//!
//!     match client.sync_employees(&employees).await {
//!         Ok(report) => println!("synced {} employees", report.synced),
//!         Err(e) => eprintln!("{}", e.user_message()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod mapping;
pub mod observability;
pub mod services;
pub mod store;
pub mod sync;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use auth::{DefaultTokenManager, TokenManager};
pub use client::{AzumutaSyncClient, AzumutaSyncClientBuilder};
pub use config::AzumutaConfig;
pub use errors::{ErrorKind, SyncError, SyncResult};
pub use mapping::EmployeeMapper;
pub use observability::{init_tracing, LogFormat};
pub use store::{ConfigStore, FileConfigStore, InMemoryConfigStore, TokenStore};
pub use sync::{SyncNotifier, SyncOrchestrator, SyncReport, TracingNotifier};

pub use types::{
    Employee, Job, RemoteEmployee, RemoteEmployeeList, RemoteEmployeeRecord, SyncBatch,
    SyncStatus, TokenState,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
