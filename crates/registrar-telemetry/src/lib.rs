//! # Registrar Telemetry
//!
//! Structured logging for the subdomain registrar.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use registrar_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//!
//!     // Registrar calls now emit structured events
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REGISTRAR_SERVICE_NAME` | `subdomain-registrar` | Service name attached to logs |
//! | `REGISTRAR_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `REGISTRAR_JSON_LOGS` | `false` | Emit one JSON object per log line |
//! | `REGISTRAR_CONSOLE_OUTPUT` | `true` | Write logs to stdout at all |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::init_logging;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The log filter directive could not be parsed.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber was already installed.
    #[error("Failed to install subscriber: {0}")]
    SubscriberInit(String),
}

/// Convenience macro for a span carrying the registrar label.
///
/// # Example
///
/// ```rust,ignore
/// use registrar_telemetry::label_span;
///
/// let _span = label_span!("configure_domain", "test").entered();
/// ```
#[macro_export]
macro_rules! label_span {
    ($name:expr, $label:expr) => {
        tracing::info_span!($name, label = %$label)
    };
}
