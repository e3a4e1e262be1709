//! # Registrar Configuration
//!
//! Environment-driven settings shared by every component built from one
//! `RegistrarContext`.

use serde::{Deserialize, Serialize};
use shared_types::{namehash, Hash};
use std::env;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// TLD is empty.
    #[error("TLD must not be empty")]
    EmptyTld,

    /// TLD spans more than one name level.
    #[error("TLD must be a single label: {0:?}")]
    MultiLevelTld(String),

    /// Maximum label length of zero.
    #[error("Maximum label length must be positive")]
    ZeroLabelLength,

    /// Environment variable present but unparseable.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },
}

/// Registrar configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrarConfig {
    /// Top-level namespace every label is registered under (e.g. `eth`).
    pub tld: String,
    /// Longest accepted label or subdomain, in bytes.
    pub max_label_len: usize,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            tld: "eth".to_string(),
            max_label_len: 255,
        }
    }
}

impl RegistrarConfig {
    /// Create configuration from environment variables.
    ///
    /// - `REGISTRAR_TLD` (default `eth`)
    /// - `REGISTRAR_MAX_LABEL_LEN` (default 255)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let tld = env::var("REGISTRAR_TLD").unwrap_or(defaults.tld);
        let max_label_len = match env::var("REGISTRAR_MAX_LABEL_LEN") {
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidEnv {
                var: "REGISTRAR_MAX_LABEL_LEN",
                value,
            })?,
            Err(_) => defaults.max_label_len,
        };

        let config = Self { tld, max_label_len };
        config.validate()?;
        Ok(config)
    }

    /// Builder-style TLD override.
    pub fn with_tld(mut self, tld: &str) -> Self {
        self.tld = tld.to_string();
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tld.is_empty() {
            return Err(ConfigError::EmptyTld);
        }
        if self.tld.contains('.') {
            return Err(ConfigError::MultiLevelTld(self.tld.clone()));
        }
        if self.max_label_len == 0 {
            return Err(ConfigError::ZeroLabelLength);
        }
        Ok(())
    }

    /// Node hash of the TLD.
    #[must_use]
    pub fn tld_node(&self) -> Hash {
        namehash(&self.tld)
    }
}
