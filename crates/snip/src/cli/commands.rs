//! # CLI Layer
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about stdout, stderr and exit codes
//! - Handles argument parsing
//! - Decides where configuration comes from
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: shell arguments to typed commands via clap
//! 2. **Context Setup**: config, logging, database pool, API facade
//! 3. **Dispatch**: one API call per command
//! 4. **Output**: JSON envelopes and exit codes via `render`
//!
//! Setup failures (unreadable config, unreachable database) are reported as
//! plain errors with exit status 1. Everything after setup goes through the
//! envelope path.

use super::logging::init_logging;
use super::render::{self, deleted_value, health_value, page_value, snip_value};
use super::setup::{get_version, Cli, Commands};
use anyhow::{bail, Context, Result};
use clap::Parser;
use directories::ProjectDirs;
use serde_json::Value;
use snipapp::api::SnipApi;
use snipapp::commands::list::ListParams;
use snipapp::config::SnipConfig;
use snipapp::model::SnipInput;
use snipapp::store::executor::Executor;
use snipapp::store::sqlite::SqliteExecutor;
use snipapp::store::SnipStore;
use std::path::PathBuf;
use tracing::debug;

const CONFIG_FILE_NAME: &str = "snip.toml";

pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(&config.log, cli.verbose)?;
    debug!(
        environment = %config.environment,
        database = %config.database.path.display(),
        "configuration loaded"
    );

    let executor = SqliteExecutor::open(&config.database)
        .with_context(|| format!("opening database {}", config.database.path.display()))?;
    executor
        .ping(config.database.connect_timeout())
        .context("database did not answer")?;
    debug!("database connection pool established");

    let api = SnipApi::new(SnipStore::new(executor, config.database.query_timeout()));
    let outcome = dispatch(&api, &config, cli.command);
    Ok(render::emit(outcome)?)
}

/// `--config` if given (it must exist), else `snip.toml` in the OS config directory.
fn config_file(cli: &Cli) -> Result<Option<PathBuf>> {
    match &cli.config {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            Ok(Some(path.clone()))
        }
        None => Ok(ProjectDirs::from("", "", "snip")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))),
    }
}

fn load_config(cli: &Cli) -> Result<SnipConfig> {
    let file = config_file(cli)?;
    let mut config = SnipConfig::load(file.as_deref()).context("loading configuration")?;
    if let Some(db) = &cli.db {
        config.database.path = db.clone();
    }
    Ok(config)
}

fn dispatch<E: Executor>(
    api: &SnipApi<E>,
    config: &SnipConfig,
    command: Commands,
) -> snipapp::error::Result<Value> {
    match command {
        Commands::Create {
            title,
            content,
            tags,
        } => {
            let input = SnipInput {
                title,
                content,
                tags: Some(tags),
            };
            api.create_snip(input).map(|snip| snip_value(&snip))
        }
        Commands::Show { id } => api.show_snip(&id).map(|snip| snip_value(&snip)),
        Commands::List {
            title,
            tags,
            page,
            page_size,
            sort,
        } => {
            let params = ListParams {
                title,
                tags,
                page,
                page_size,
                sort,
            };
            api.list_snips(&params).map(|page| page_value(&page))
        }
        Commands::Update {
            id,
            title,
            content,
            tags,
            clear_tags,
            if_version,
        } => {
            let input = SnipInput {
                title,
                content,
                tags: update_tags(tags, clear_tags),
            };
            api.update_snip(&id, input, if_version)
                .map(|snip| snip_value(&snip))
        }
        Commands::Delete { id } => api.delete_snip(&id).map(|()| deleted_value()),
        Commands::Healthcheck => api
            .healthcheck()
            .map(|()| health_value(&config.environment, get_version())),
    }
}

/// `--clear-tags` sets an empty list; no `--tag` leaves the tags alone.
fn update_tags(tags: Vec<String>, clear_tags: bool) -> Option<Vec<String>> {
    if clear_tags {
        Some(Vec::new())
    } else if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_tags_distinguishes_absent_and_cleared() {
        assert_eq!(update_tags(vec![], false), None);
        assert_eq!(update_tags(vec![], true), Some(vec![]));
        assert_eq!(
            update_tags(vec!["x".into()], false),
            Some(vec!["x".to_string()])
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let cli = Cli::try_parse_from(["snip", "--config", "/nonexistent/snip.toml", "healthcheck"])
            .unwrap();
        assert!(config_file(&cli).is_err());
    }

    #[test]
    fn db_flag_overrides_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("snip.toml");
        std::fs::write(&file, "[database]\npath = \"from-file.db\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "snip",
            "--config",
            file.to_str().unwrap(),
            "--db",
            "from-flag.db",
            "healthcheck",
        ])
        .unwrap();
        let config = load_config(&cli).unwrap();
        assert_eq!(config.database.path, PathBuf::from("from-flag.db"));
    }
}
