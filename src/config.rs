//! Gateway configuration.
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables prefixed with `EMPLOYEE_GATEWAY` (nested keys separated by `__`,
//! e.g. `EMPLOYEE_GATEWAY__BACKEND__MAX_RETRIES=3`).

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::retry::RetryPolicy;

/// Environment variable prefix for configuration overrides.
pub const ENV_PREFIX: &str = "EMPLOYEE_GATEWAY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// The configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] config::ConfigError),

    /// The configuration file path is invalid.
    #[error("invalid configuration path: {0}")]
    InvalidPath(String),

    /// A value parsed but makes no sense.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Address the public HTTP API listens on.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub bind_address: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8111,
        }
    }
}

impl ServerConfig {
    /// Get the full bind address (ip:port)
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// How to reach the upstream employee service and how hard to retry it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Address of the upstream employee collection
    pub url: String,
    /// Retries after the first attempt when the upstream rate-limits
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub retry_backoff_ms: u64,
    /// Cap on any single retry delay, in milliseconds
    pub max_backoff_ms: u64,
    /// Per-request timeout, in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8112/api/v1/employee".to_string(),
            max_retries: 5,
            retry_backoff_ms: 1_000,
            max_backoff_ms: 30_000,
            request_timeout_ms: 10_000,
        }
    }
}

impl BackendConfig {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// The retry policy described by this configuration.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_backoff(), self.max_backoff(), self.max_retries)
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file with environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file does not exist
    /// - The configuration file cannot be parsed
    /// - A value fails validation
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let path_str = path
            .to_str()
            .ok_or_else(|| ConfigError::InvalidPath(format!("{:?}", path)))?;

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path_str.to_string()));
        }

        let config = Config::builder()
            .add_source(File::with_name(path_str))
            .add_source(env_source())
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Load configuration from defaults and environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder().add_source(env_source()).build()?;
        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Check values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "backend.url must not be empty".to_string(),
            ));
        }
        if self.backend.retry_backoff_ms > self.backend.max_backoff_ms {
            return Err(ConfigError::InvalidValue(format!(
                "backend.retry_backoff_ms ({}) exceeds backend.max_backoff_ms ({})",
                self.backend.retry_backoff_ms, self.backend.max_backoff_ms
            )));
        }
        if self.backend.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "backend.request_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
