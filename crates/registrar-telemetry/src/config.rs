//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for registrar logging.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "subdomain-registrar".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `REGISTRAR_SERVICE_NAME`: Service name (default: subdomain-registrar)
    /// - `REGISTRAR_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `REGISTRAR_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `REGISTRAR_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("REGISTRAR_SERVICE_NAME")
                .unwrap_or_else(|_| "subdomain-registrar".to_string()),

            log_level: env::var("REGISTRAR_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("REGISTRAR_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("REGISTRAR_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Configuration with a fixed level, for tests and tools.
    pub fn with_level(level: &str) -> Self {
        Self {
            log_level: level.to_string(),
            ..Self::default()
        }
    }
}
