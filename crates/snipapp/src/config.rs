//! # Configuration
//!
//! Snip configuration is loaded with [`confique`] from, in priority order:
//! 1. **Environment variables**: `SNIP_DB_PATH`, `SNIP_LOG_LEVEL`, etc.
//! 2. **Config file**: a TOML file (`snip.toml`), if one is given and exists.
//! 3. **Compiled defaults**: via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Env | Default |
//! |-----|-----|---------|
//! | `environment` | `SNIP_ENV` | `development` |
//! | `database.path` | `SNIP_DB_PATH` | `snips.db` |
//! | `database.max_open_conns` | `SNIP_DB_MAX_OPEN_CONNS` | `25` |
//! | `database.max_idle_conns` | `SNIP_DB_MAX_IDLE_CONNS` | `25` |
//! | `database.max_idle_time_secs` | `SNIP_DB_MAX_IDLE_TIME_SECS` | `900` |
//! | `database.connect_timeout_ms` | `SNIP_DB_CONNECT_TIMEOUT_MS` | `5000` |
//! | `database.query_timeout_ms` | `SNIP_DB_QUERY_TIMEOUT_MS` | `3000` |
//! | `log.level` | `SNIP_LOG_LEVEL` | `info` |
//! | `log.format` | `SNIP_LOG_FORMAT` | `human` |

use crate::error::Result;
use crate::validator::{permitted_value, Validator};
use confique::Config;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENVIRONMENTS: &[&str] = &["development", "staging", "production"];
pub const LOG_FORMATS: &[&str] = &["human", "json"];

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SnipConfig {
    /// Deployment name reported by the health check.
    #[config(env = "SNIP_ENV", default = "development")]
    pub environment: String,

    #[config(nested)]
    pub database: DatabaseConfig,

    #[config(nested)]
    pub log: LogConfig,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite database file. Parent directories are created on open.
    #[config(env = "SNIP_DB_PATH", default = "snips.db")]
    pub path: PathBuf,

    /// Upper bound on pooled connections. Zero is treated as one.
    #[config(env = "SNIP_DB_MAX_OPEN_CONNS", default = 25)]
    pub max_open_conns: u32,

    /// Connections kept open while idle. Capped at `max_open_conns`.
    #[config(env = "SNIP_DB_MAX_IDLE_CONNS", default = 25)]
    pub max_idle_conns: u32,

    /// Idle connections older than this are closed. Zero keeps them forever.
    #[config(env = "SNIP_DB_MAX_IDLE_TIME_SECS", default = 900)]
    pub max_idle_time_secs: u64,

    /// Bound on opening the pool and checking the database is reachable.
    #[config(env = "SNIP_DB_CONNECT_TIMEOUT_MS", default = 5000)]
    pub connect_timeout_ms: u64,

    /// Bound on every store operation.
    #[config(env = "SNIP_DB_QUERY_TIMEOUT_MS", default = 3000)]
    pub query_timeout_ms: u64,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// A `tracing` filter directive, e.g. `info` or `snipapp=debug`.
    #[config(env = "SNIP_LOG_LEVEL", default = "info")]
    pub level: String,

    /// `human` or `json`.
    #[config(env = "SNIP_LOG_FORMAT", default = "human")]
    pub format: String,
}

impl Default for SnipConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            database: DatabaseConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("snips.db"),
            max_open_conns: 25,
            max_idle_conns: 25,
            max_idle_time_secs: 900,
            connect_timeout_ms: 5000,
            query_timeout_ms: 3000,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "human".to_string(),
        }
    }
}

impl SnipConfig {
    /// Loads environment overrides on top of `file` (when it exists) and defaults.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = SnipConfig::builder().env();
        if let Some(path) = file {
            builder = builder.file(path);
        }
        let config = builder.load()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that are well-formed but not usable.
    pub fn validate(&self) -> Result<()> {
        let mut v = Validator::new();
        v.check(
            permitted_value(&self.environment.as_str(), ENVIRONMENTS),
            "environment",
            "must be development, staging or production",
        );
        v.check(
            permitted_value(&self.log.format.as_str(), LOG_FORMATS),
            "log.format",
            "must be human or json",
        );
        v.check(!self.log.level.trim().is_empty(), "log.level", "must be provided");
        v.check(
            !self.database.path.as_os_str().is_empty(),
            "database.path",
            "must be provided",
        );
        v.into_result()
    }
}

impl DatabaseConfig {
    /// A config for `path` with every other setting at its default.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn max_idle_time(&self) -> Option<Duration> {
        match self.max_idle_time_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms.max(1))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms.max(1))
    }
}
