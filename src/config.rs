//! # Application Configuration
//!
//! One JSON file with four sections, every field defaulted. A missing file
//! yields the defaults. A few settings can be overridden from the
//! environment:
//!
//! - `AGRIDASH_PORT`
//! - `AGRIDASH_JWT_SECRET`
//! - `AGRIDASH_DATA_FILE`
//!
//! Configuration is validated once at startup and is immutable afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::{JwtConfig, PasswordPolicy};
use crate::http_server::HttpServerConfig;
use crate::observability::{log_event_with_fields, Event};
use crate::sources::SourceConfig;

pub const ENV_PORT: &str = "AGRIDASH_PORT";
pub const ENV_JWT_SECRET: &str = "AGRIDASH_JWT_SECRET";
pub const ENV_DATA_FILE: &str = "AGRIDASH_DATA_FILE";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value for {var}: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// ==================
// Sections
// ==================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,
}

fn default_jwt_secret() -> String {
    JwtConfig::default().secret
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_password_min_length() -> usize {
    PasswordPolicy::default().min_length
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            password_min_length: default_password_min_length(),
        }
    }
}

impl AuthConfig {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            ttl: chrono::Duration::hours(self.token_ttl_hours),
        }
    }

    pub fn password_policy(&self) -> PasswordPolicy {
        PasswordPolicy {
            min_length: self.password_min_length,
        }
    }
}

/// Where records live. No file means an in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Fixed generator seed for reproducible data
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_true")]
    pub refresh_on_start: bool,

    /// Pad single-year trends with synthetic neighbours
    #[serde(default)]
    pub synthetic_trend_points: bool,

    #[serde(default = "default_trend_since_year")]
    pub trend_since_year: i32,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

fn default_trend_since_year() -> i32 {
    2019
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            seed: None,
            refresh_on_start: true,
            synthetic_trend_points: false,
            trend_since_year: default_trend_since_year(),
        }
    }
}

impl IngestionConfig {
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            seed: self.seed,
        }
    }
}

// ==================
// AppConfig
// ==================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub ingestion: IngestionConfig,
}

impl AppConfig {
    /// Load from `path` (or defaults), apply environment overrides, validate
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(path)?,
            Some(path) => {
                log_event_with_fields(
                    Event::ConfigDefaulted,
                    &[("path", path.display().to_string().as_str())],
                );
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let config = Self::from_json(&text).map_err(|e| match e {
            ConfigError::Invalid(reason) => ConfigError::Parse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
        Ok(config)
    }

    pub fn from_json(text: &str) -> ConfigResult<Self> {
        serde_json::from_str(text).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Env {
                var: ENV_PORT,
                reason: format!("'{}' is not a port number", port),
            })?;
        }
        if let Some(secret) = lookup(ENV_JWT_SECRET) {
            self.auth.jwt_secret = secret;
        }
        if let Some(file) = lookup(ENV_DATA_FILE) {
            self.store.data_file = if file.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(file))
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".into()));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid("auth.token_ttl_hours must be positive".into()));
        }
        if self.ingestion.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "ingestion.request_timeout_ms must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
