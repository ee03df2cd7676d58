//! Configuration types for the dictkv daemon.
//!
//! This module provides configuration structs for loading and validating
//! daemon settings from TOML files. It includes:
//!
//! - [`DictConfig`] - Root configuration struct
//! - [`ExpirationConfig`] - TTL defaults, ceiling and sweep cadence
//! - [`ServerConfig`] - HTTP listener and API key
//! - [`PersistenceConfig`] - Snapshot file location
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working development setup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::daemon::services::kv::ExpirationPolicy;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if there are any warnings.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// dictkv.toml configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DictConfig {
    #[serde(default)]
    pub expiration: ExpirationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Expiration settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpirationConfig {
    #[serde(default = "default_expiration")]
    pub default_expiration_in_seconds: u64,
    #[serde(default = "max_expiration")]
    pub max_expiration_in_seconds: u64,
    #[serde(default = "default_cleanup_period")]
    pub cleanup_period_in_seconds: u64,
}

impl Default for ExpirationConfig {
    fn default() -> Self {
        Self {
            default_expiration_in_seconds: default_expiration(),
            max_expiration_in_seconds: max_expiration(),
            cleanup_period_in_seconds: default_cleanup_period(),
        }
    }
}

impl ExpirationConfig {
    /// TTL policy handed to the store.
    pub fn policy(&self) -> ExpirationPolicy {
        ExpirationPolicy::new(
            self.default_expiration_in_seconds,
            self.max_expiration_in_seconds,
        )
    }

    pub fn cleanup_period(&self) -> Duration {
        Duration::from_secs(self.cleanup_period_in_seconds)
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret expected in the `ApiKey` header. Unset disables auth.
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

impl ServerConfig {
    /// Parses `host:port` into a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

/// Snapshot settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistenceConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
        }
    }
}

fn default_expiration() -> u64 {
    constants::DEFAULT_EXPIRATION_SECS
}

fn max_expiration() -> u64 {
    constants::MAX_EXPIRATION_SECS
}

fn default_cleanup_period() -> u64 {
    constants::DEFAULT_CLEANUP_PERIOD_SECS
}

fn default_host() -> String {
    constants::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    constants::DEFAULT_PORT
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(constants::DEFAULT_SNAPSHOT_FILE)
}

impl DictConfig {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - Fields have invalid types or are unknown
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: DictConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Locate and load configuration.
    ///
    /// Resolution order:
    /// 1. `explicit` path (from `--config`)
    /// 2. `DICTKV_CONFIG` environment variable (if set)
    /// 3. `dictkv.toml` in the working directory (if it exists)
    /// 4. Built-in defaults
    ///
    /// `DICTKV_API_KEY`, when set, replaces `server.api_key`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(constants::CONFIG_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let api_key = std::env::var(constants::API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty());

        Self::resolve_with(explicit, env_path, api_key)
    }

    fn resolve_with(
        explicit: Option<&Path>,
        env_path: Option<PathBuf>,
        api_key_override: Option<String>,
    ) -> Result<Self> {
        let mut config = if let Some(path) = explicit {
            Self::load_from(path)?
        } else if let Some(path) = env_path {
            Self::load_from(path)?
        } else if Path::new(constants::DEFAULT_CONFIG_FILE).exists() {
            Self::load_from(constants::DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };

        if api_key_override.is_some() {
            config.server.api_key = api_key_override;
        }

        Ok(config)
    }

    /// Validate configuration with comprehensive checks.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Zero expiration or cleanup values
    /// - `max_expiration_in_seconds` above 100 years
    /// - Port 0
    /// - Empty snapshot path or API key
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Expiration
        let exp = &self.expiration;
        if exp.default_expiration_in_seconds == 0 {
            errors.push("expiration.default_expiration_in_seconds must be positive".to_string());
        }
        if exp.max_expiration_in_seconds == 0 {
            errors.push("expiration.max_expiration_in_seconds must be positive".to_string());
        } else if exp.max_expiration_in_seconds > constants::MAX_EXPIRATION_CEILING_SECS {
            errors.push(format!(
                "expiration.max_expiration_in_seconds ({}) exceeds the limit of {}s (100 years)",
                exp.max_expiration_in_seconds,
                constants::MAX_EXPIRATION_CEILING_SECS
            ));
        }
        if exp.cleanup_period_in_seconds == 0 {
            errors.push("expiration.cleanup_period_in_seconds must be positive".to_string());
        }
        if exp.default_expiration_in_seconds > exp.max_expiration_in_seconds
            && exp.max_expiration_in_seconds > 0
        {
            warnings.push(format!(
                "default_expiration_in_seconds ({}) exceeds max_expiration_in_seconds ({})\n  \
                 Records created without a TTL will be clamped to {}s",
                exp.default_expiration_in_seconds,
                exp.max_expiration_in_seconds,
                exp.max_expiration_in_seconds
            ));
        }
        if exp.cleanup_period_in_seconds > exp.max_expiration_in_seconds
            && exp.max_expiration_in_seconds > 0
        {
            warnings.push(format!(
                "cleanup_period_in_seconds ({}) is longer than max_expiration_in_seconds ({})\n  \
                 Expired records may linger for up to one cleanup period",
                exp.cleanup_period_in_seconds, exp.max_expiration_in_seconds
            ));
        }

        // 2. Server
        if self.server.port == 0 {
            errors.push(
                "Server port cannot be 0. Use a valid port number (1-65535)".to_string(),
            );
        } else if let Err(e) = self.server.listen_addr() {
            errors.push(format!("{e:#}"));
        }
        match self.server.api_key.as_deref() {
            None => warnings.push(
                "server.api_key is not set; requests will not be authenticated\n  \
                 Set it in the config file or via DICTKV_API_KEY"
                    .to_string(),
            ),
            Some(key) if key.trim().is_empty() => {
                errors.push("server.api_key cannot be empty".to_string());
            },
            Some(_) => {},
        }

        // 3. Persistence
        if self.persistence.snapshot_path.as_os_str().is_empty() {
            errors.push("persistence.snapshot_path cannot be empty".to_string());
        } else if self.persistence.snapshot_path.is_dir() {
            errors.push(format!(
                "persistence.snapshot_path is a directory: {}",
                self.persistence.snapshot_path.display()
            ));
        }

        // Return errors if any
        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        // Return warnings (caller decides how to handle/display them)
        Ok(ValidationResult { warnings })
    }
}
