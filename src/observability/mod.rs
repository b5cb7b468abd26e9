//! Logging setup.
//!
//! The crate itself only emits `tracing` events and spans. Binaries and hosts
//! call [`init_tracing`] once to install a subscriber.

use std::str::FromStr;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::SyncError;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output (for development).
    #[default]
    Pretty,
    /// JSON lines (for log shipping).
    Json,
    /// Single-line output.
    Compact,
}

impl LogFormat {
    /// Reads `AZUMUTA_LOG_FORMAT`, falling back to pretty output.
    pub fn from_env() -> Self {
        std::env::var("AZUMUTA_LOG_FORMAT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogFormat {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(SyncError::Configuration {
                message: format!("Unknown log format '{}'", other),
            }),
        }
    }
}

/// Installs a global subscriber filtered by `RUST_LOG`.
///
/// Returns false if a subscriber was already installed; calling this twice is
/// harmless.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let result = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init(),
    };

    result.is_ok()
}
