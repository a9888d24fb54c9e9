//! Configuration management for the admin client
//!
//! Configuration comes from environment variables or a TOML file and is
//! validated before any gateway is built.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::gateway::ClientConfig;
use crate::queue::FlightPolicy;
use crate::structure::{MaterializeOptions, RootPolicy};
use crate::utils::retry::RetryConfig;

const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend gateway configuration
    pub gateway: GatewayConfig,

    /// Structure materializer configuration
    pub structure: StructureConfig,

    /// Queue coordinator configuration
    pub queue: QueueConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API base URL
    pub base_url: String,

    /// Session token (`Authorization: Token ...`)
    pub api_token: Option<String>,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Retries for idempotent reads
    pub retry_count: u32,

    /// Base retry delay in milliseconds
    pub retry_delay_ms: u64,
}

/// Materializer settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub root_policy: RootPolicy,

    /// Depth bound; the node count when unset
    pub max_depth: Option<usize>,
}

/// Queue coordinator settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub flight_policy: FlightPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_API_URL),
            api_token: None,
            request_timeout_secs: 10,
            retry_count: 2,
            retry_delay_ms: 500,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("EQUILIBRIUM_API_URL").unwrap_or(defaults.gateway.base_url);

        let api_token = std::env::var("EQUILIBRIUM_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());

        let request_timeout_secs = env_parse("EQUILIBRIUM_REQUEST_TIMEOUT")
            .unwrap_or(defaults.gateway.request_timeout_secs);

        let retry_count =
            env_parse("EQUILIBRIUM_RETRY_COUNT").unwrap_or(defaults.gateway.retry_count);

        let retry_delay_ms =
            env_parse("EQUILIBRIUM_RETRY_DELAY_MS").unwrap_or(defaults.gateway.retry_delay_ms);

        let root_policy = match std::env::var("EQUILIBRIUM_ROOT_POLICY") {
            Ok(v) => v
                .parse::<RootPolicy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid EQUILIBRIUM_ROOT_POLICY")?,
            Err(_) => RootPolicy::default(),
        };

        let max_depth = env_parse("EQUILIBRIUM_MAX_DEPTH");

        let flight_policy = match std::env::var("EQUILIBRIUM_FLIGHT_POLICY") {
            Ok(v) => v
                .parse::<FlightPolicy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid EQUILIBRIUM_FLIGHT_POLICY")?,
            Err(_) => FlightPolicy::default(),
        };

        let log_level =
            std::env::var("EQUILIBRIUM_LOG_LEVEL").unwrap_or_else(|_| String::from("info"));

        let log_format =
            std::env::var("EQUILIBRIUM_LOG_FORMAT").unwrap_or_else(|_| String::from("text"));

        Ok(Self {
            gateway: GatewayConfig {
                base_url,
                api_token,
                request_timeout_secs,
                retry_count,
                retry_delay_ms,
            },
            structure: StructureConfig {
                root_policy,
                max_depth,
            },
            queue: QueueConfig { flight_policy },
            logging: LoggingConfig {
                level: log_level,
                format: log_format,
            },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.gateway.base_url)
            .with_context(|| format!("Invalid API URL: {}", self.gateway.base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API URL must use http or https, got {}", url.scheme());
        }

        if self.gateway.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.structure.max_depth == Some(0) {
            anyhow::bail!("max_depth must be greater than 0 when set");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be text or json, got {}", self.logging.format);
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway.request_timeout_secs)
    }

    /// HTTP gateway settings
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        let retry = RetryConfig::with_delays(
            self.gateway.retry_count,
            self.gateway.retry_delay_ms,
            self.gateway.retry_delay_ms.saturating_mul(20),
        );
        let config = ClientConfig::new(self.gateway.base_url.clone())
            .with_timeout(self.request_timeout())
            .with_retry(retry);

        match &self.gateway.api_token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }

    /// Materializer options
    #[must_use]
    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions {
            root_policy: self.structure.root_policy,
            max_depth: self.structure.max_depth,
        }
    }
}
