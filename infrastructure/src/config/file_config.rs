//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use crate::registry::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, RegistrySettings};
use ror_application::FetchPolicy;
use ror_domain::{ExportLayout, OutputFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

// Re-export OutputFormat from domain for convenience
pub use ror_domain::OutputFormat as FileOutputFormat;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("registry.timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("fetch.max_attempts cannot be 0")]
    InvalidMaxAttempts,

    #[error("registry.base_url cannot be empty")]
    EmptyBaseUrl,
}

/// Raw registry configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRegistryConfig {
    /// Lookup endpoint; the identifier is appended as a path segment
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for FileRegistryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Raw fetch loop configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFetchConfig {
    pub max_attempts: u32,
    pub rate_limit_cooldown_seconds: u64,
    pub network_retry_delay_seconds: u64,
    pub pacing_delay_ms: u64,
}

impl Default for FileFetchConfig {
    fn default() -> Self {
        let policy = FetchPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            rate_limit_cooldown_seconds: policy.rate_limit_cooldown.as_secs(),
            network_retry_delay_seconds: policy.network_retry_delay.as_secs(),
            pacing_delay_ms: policy.pacing_delay.as_millis() as u64,
        }
    }
}

/// Raw output configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format (uses domain type)
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
    /// Use the extended column set for JSON/CSV
    pub extended: bool,
    /// Where `--save` writes artifacts (current directory if unset)
    pub directory: Option<PathBuf>,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            extended: false,
            directory: None,
        }
    }
}

impl FileOutputConfig {
    pub fn layout(&self) -> ExportLayout {
        if self.extended {
            ExportLayout::Extended
        } else {
            ExportLayout::Basic
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Registry connection settings
    pub registry: FileRegistryConfig,
    /// Retry, backoff and pacing
    pub fetch: FileFetchConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.registry.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.fetch.max_attempts == 0 {
            return Err(ConfigValidationError::InvalidMaxAttempts);
        }

        if self.registry.base_url.trim().is_empty() {
            return Err(ConfigValidationError::EmptyBaseUrl);
        }

        Ok(())
    }

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            base_url: self.registry.base_url.clone(),
            timeout: Duration::from_secs(self.registry.timeout_seconds),
            user_agent: self.registry.user_agent.clone(),
        }
    }

    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy::default()
            .with_max_attempts(self.fetch.max_attempts)
            .with_rate_limit_cooldown(Duration::from_secs(self.fetch.rate_limit_cooldown_seconds))
            .with_network_retry_delay(Duration::from_secs(self.fetch.network_retry_delay_seconds))
            .with_pacing_delay(Duration::from_millis(self.fetch.pacing_delay_ms))
    }
}
