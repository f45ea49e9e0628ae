//! SQLite executor backed by a bounded `r2d2` connection pool.
//!
//! ## Timeouts
//!
//! Each call gets a deadline. Three things can run past it, and all three are
//! reported as [`StoreError::Timeout`]:
//! 1. waiting for a pooled connection,
//! 2. waiting on another connection's lock (`busy_timeout`),
//! 3. the statement itself (interrupted through the progress handler).
//!
//! ## Schema
//!
//! `snips.tags` holds a JSON array. Two derived tables are maintained by
//! triggers so searches can use indexes:
//! - `snips_title_fts`: FTS5 external-content index over `title`
//! - `snip_tags`: one `(snip_id, tag)` row per tag, indexed by tag

use super::executor::{Executor, Row, SqlValue, Statement};
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{ToSql, ToSqlOutput, Type, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, ErrorCode};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// SQLite VM steps between deadline checks.
const PROGRESS_STEPS: i32 = 1_000;

const CONNECTION_PRAGMAS: &str = "
    PRAGMA busy_timeout = 5000;
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA foreign_keys = ON;
";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS snips (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
        title TEXT NOT NULL,
        content TEXT NOT NULL DEFAULT '',
        tags TEXT NOT NULL DEFAULT '[]',
        version INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS snip_tags (
        snip_id INTEGER NOT NULL REFERENCES snips(id) ON DELETE CASCADE,
        tag TEXT NOT NULL,
        PRIMARY KEY (snip_id, tag)
    );

    CREATE INDEX IF NOT EXISTS snip_tags_tag_idx ON snip_tags(tag, snip_id);

    CREATE VIRTUAL TABLE IF NOT EXISTS snips_title_fts USING fts5(
        title,
        content = 'snips',
        content_rowid = 'id',
        tokenize = 'unicode61 remove_diacritics 0'
    );

    CREATE TRIGGER IF NOT EXISTS snips_after_insert AFTER INSERT ON snips BEGIN
        INSERT INTO snips_title_fts(rowid, title) VALUES (new.id, new.title);
        INSERT OR IGNORE INTO snip_tags(snip_id, tag)
            SELECT new.id, value FROM json_each(new.tags);
    END;

    CREATE TRIGGER IF NOT EXISTS snips_after_update AFTER UPDATE ON snips BEGIN
        INSERT INTO snips_title_fts(snips_title_fts, rowid, title)
            VALUES ('delete', old.id, old.title);
        INSERT INTO snips_title_fts(rowid, title) VALUES (new.id, new.title);
        DELETE FROM snip_tags WHERE snip_id = old.id;
        INSERT OR IGNORE INTO snip_tags(snip_id, tag)
            SELECT new.id, value FROM json_each(new.tags);
    END;

    CREATE TRIGGER IF NOT EXISTS snips_after_delete AFTER DELETE ON snips BEGIN
        INSERT INTO snips_title_fts(snips_title_fts, rowid, title)
            VALUES ('delete', old.id, old.title);
        DELETE FROM snip_tags WHERE snip_id = old.id;
    END;
";

#[derive(Clone)]
pub struct SqliteExecutor {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteExecutor {
    /// Opens (creating if needed) the database at `config.path` and migrates it.
    pub fn open(config: &DatabaseConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(&config.path)
            .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

        // r2d2 panics on a zero-sized pool or min_idle above max_size
        let max_size = config.max_open_conns.max(1);
        let min_idle = config.max_idle_conns.min(max_size);
        let pool = Pool::builder()
            .max_size(max_size)
            .min_idle(Some(min_idle))
            .idle_timeout(config.max_idle_time())
            .connection_timeout(config.connect_timeout())
            .build(manager)?;

        let executor = Self { pool };
        executor.migrate(config.connect_timeout())?;

        debug!(
            path = %config.path.display(),
            max_size,
            min_idle,
            "sqlite connection pool established"
        );
        Ok(executor)
    }

    /// Round trip that proves a connection can be taken and used.
    pub fn ping(&self, timeout: Duration) -> Result<(), StoreError> {
        self.query_scalar(&Statement::new("SELECT 1"), timeout)
            .map(|_| ())
    }

    fn migrate(&self, timeout: Duration) -> Result<(), StoreError> {
        self.with_connection(timeout, |conn| conn.execute_batch(SCHEMA))
    }

    fn with_connection<T>(
        &self,
        timeout: Duration,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let conn = self.pool.get_timeout(timeout).map_err(|err| {
            warn!(error = %err, ?timeout, "no pooled connection available");
            StoreError::Timeout(timeout)
        })?;

        conn.busy_timeout(timeout)?;
        let deadline = Instant::now() + timeout;
        conn.progress_handler(PROGRESS_STEPS, Some(move || Instant::now() >= deadline));

        let result = f(&conn);

        conn.progress_handler(0, None::<fn() -> bool>);
        result.map_err(|err| classify(err, timeout))
    }
}

impl Executor for SqliteExecutor {
    fn query(&self, stmt: &Statement, timeout: Duration) -> Result<Vec<Row>, StoreError> {
        self.with_connection(timeout, |conn| {
            let mut prepared = conn.prepare(stmt.sql())?;
            let columns = prepared.column_count();
            let mut rows = prepared.query(params_from_iter(stmt.params()))?;

            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                let mut values = Vec::with_capacity(columns);
                for idx in 0..columns {
                    values.push(read_value(idx, row.get_ref(idx)?)?);
                }
                out.push(Row::new(values));
            }
            Ok(out)
        })
    }

    fn execute(&self, stmt: &Statement, timeout: Duration) -> Result<usize, StoreError> {
        self.with_connection(timeout, |conn| {
            conn.execute(stmt.sql(), params_from_iter(stmt.params()))
        })
    }
}

fn classify(err: rusqlite::Error, timeout: Duration) -> StoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(
                failure.code,
                ErrorCode::OperationInterrupted
                    | ErrorCode::DatabaseBusy
                    | ErrorCode::DatabaseLocked
            ) =>
        {
            StoreError::Timeout(timeout)
        }
        _ => StoreError::Database(err),
    }
}

fn read_value(idx: usize, value: ValueRef<'_>) -> rusqlite::Result<SqlValue> {
    match value {
        ValueRef::Null => Ok(SqlValue::Null),
        ValueRef::Integer(n) => Ok(SqlValue::Integer(n)),
        ValueRef::Real(f) => Ok(SqlValue::Real(f)),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes)
            .map(|s| SqlValue::Text(s.to_string()))
            .map_err(rusqlite::Error::Utf8Error),
        ValueRef::Blob(_) => Err(rusqlite::Error::InvalidColumnType(
            idx,
            String::new(),
            Type::Blob,
        )),
    }
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlValue::Null => Ok(ToSqlOutput::Owned(Value::Null)),
            SqlValue::Integer(n) => Ok(ToSqlOutput::from(*n)),
            SqlValue::Real(f) => Ok(ToSqlOutput::from(*f)),
            SqlValue::Text(s) => Ok(ToSqlOutput::from(s.as_str())),
            SqlValue::TextList(list) => serde_json::to_string(list)
                .map(ToSqlOutput::from)
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e))),
        }
    }
}
