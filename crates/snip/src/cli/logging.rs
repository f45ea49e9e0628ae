//! Structured logging setup.
//!
//! Two formats, picked by `log.format`:
//! - `human`: readable lines for a terminal
//! - `json`: newline-delimited JSON for log collectors
//!
//! Logs are written to stderr so stdout carries only the response envelope.
//! `RUST_LOG`, when set, overrides the configured level.

use anyhow::{bail, Context, Result};
use snipapp::config::LogConfig;
use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl LogFormat {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "human" => Ok(LogFormat::Human),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format {other:?} (expected human or json)"),
        }
    }
}

/// Directive used when `RUST_LOG` is unset. `-v` forces `debug`.
pub fn level_directive(config: &LogConfig, verbose: bool) -> &str {
    if verbose {
        "debug"
    } else {
        config.level.as_str()
    }
}

pub fn init_logging(config: &LogConfig, verbose: bool) -> Result<()> {
    let format = LogFormat::parse(&config.format)?;
    let level = level_directive(config, verbose);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {level:?}"))?,
    };

    match format {
        LogFormat::Human => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .try_init()?,
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(true),
            )
            .try_init()?,
    }
    Ok(())
}
