//! # Storage Layer
//!
//! [`SnipStore`] persists snips through an [`Executor`], the seam between the
//! record logic and a concrete database. Production uses
//! [`sqlite::SqliteExecutor`]; tests can swap in any executor.
//!
//! ## Optimistic Concurrency
//!
//! Every stored snip carries a `version`. An update is conditional on the
//! version the caller last read:
//!
//! ```text
//! UPDATE snips SET ..., version = version + 1
//!  WHERE id = ? AND version = ?
//!  RETURNING version
//! ```
//!
//! No returned row means the snip was changed or deleted since it was read,
//! and the update fails with [`SnipError::EditConflict`]. The check and the
//! write are one statement, so two racing updates can never both succeed.
//!
//! ## Deadlines
//!
//! Each operation runs under the store's timeout. Running out of time is a
//! [`StoreError::Timeout`], distinct from any other store failure.
//!
//! ## Operations
//!
//! | Operation | Missing record        | Stale version  |
//! |-----------|-----------------------|----------------|
//! | `insert`  | n/a                   | n/a            |
//! | `get`     | `NotFound`            | n/a            |
//! | `update`  | `EditConflict`        | `EditConflict` |
//! | `delete`  | `NotFound`            | n/a            |
//! | `search`  | empty page, zero meta | n/a            |

pub mod executor;
pub mod query;
pub mod sqlite;

use chrono::{DateTime, Utc};
use crate::error::{Result, SnipError, StoreError};
use crate::filters::{calculate_metadata, Filters, Metadata};
use crate::model::Snip;
use executor::{Executor, Row, Statement};
use query::SNIP_COLUMNS;
use std::time::Duration;
use tracing::{debug, error};

pub struct SnipStore<E: Executor> {
    executor: E,
    timeout: Duration,
}

impl<E: Executor> SnipStore<E> {
    pub fn new(executor: E, timeout: Duration) -> Self {
        Self { executor, timeout }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Stores a new snip. The returned copy carries the assigned `id`,
    /// `created_at` and `version` (always 1).
    pub fn insert(&self, snip: Snip) -> Result<Snip> {
        let stmt = Statement::new(
            "INSERT INTO snips (title, content, tags) VALUES (?, ?, ?) \
             RETURNING id, created_at, version",
        )
        .bind(snip.title.as_str())
        .bind(snip.content.as_str())
        .bind(snip.tags.clone());

        let row = self.query_row("insert", None, &stmt)?.ok_or_else(|| {
            self.fail("insert", None, StoreError::Decode("no row returned".into()))
        })?;

        let (id, created_at, version) =
            read_assigned(&row).map_err(|err| self.fail("insert", None, err))?;
        let stored = Snip {
            id,
            created_at,
            version,
            ..snip
        };

        debug!(id = stored.id, "snip inserted");
        Ok(stored)
    }

    pub fn get(&self, id: i64) -> Result<Snip> {
        if id < 1 {
            return Err(SnipError::NotFound);
        }

        let stmt =
            Statement::new(format!("SELECT {SNIP_COLUMNS} FROM snips WHERE id = ?")).bind(id);
        match self.query_row("get", Some(id), &stmt)? {
            Some(row) => snip_from_row(&row, 0).map_err(|err| self.fail("get", Some(id), err)),
            None => Err(SnipError::NotFound),
        }
    }

    /// Writes `snip` if the stored version still equals `snip.version`.
    ///
    /// On success the returned snip carries the new version.
    pub fn update(&self, snip: Snip) -> Result<Snip> {
        let stmt = Statement::new(
            "UPDATE snips SET title = ?, content = ?, tags = ?, version = version + 1 \
             WHERE id = ? AND version = ? RETURNING version",
        )
        .bind(snip.title.as_str())
        .bind(snip.content.as_str())
        .bind(snip.tags.clone())
        .bind(snip.id)
        .bind(snip.version);

        match self.query_row("update", Some(snip.id), &stmt)? {
            Some(row) => {
                let version = row
                    .get_i32(0)
                    .map_err(|err| self.fail("update", Some(snip.id), err))?;
                debug!(id = snip.id, version, "snip updated");
                Ok(Snip { version, ..snip })
            }
            None => {
                debug!(id = snip.id, version = snip.version, "update lost version check");
                Err(SnipError::EditConflict)
            }
        }
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        if id < 1 {
            return Err(SnipError::NotFound);
        }

        let stmt = Statement::new("DELETE FROM snips WHERE id = ?").bind(id);
        let affected = self
            .executor
            .execute(&stmt, self.timeout)
            .map_err(|err| self.fail("delete", Some(id), err))?;

        if affected == 0 {
            return Err(SnipError::NotFound);
        }
        debug!(id, "snip deleted");
        Ok(())
    }

    /// One page of snips whose title contains every word of `title` and whose
    /// tags include every entry of `tags`, plus pagination metadata.
    ///
    /// Empty `title` and `tags` match everything. A page past the end is empty
    /// and reports zero metadata.
    pub fn search(
        &self,
        title: &str,
        tags: &[String],
        filters: &Filters,
    ) -> Result<(Vec<Snip>, Metadata)> {
        let Some(stmt) = query::plan_search(title, tags, filters) else {
            debug!(title, "title has no searchable words");
            return Ok((Vec::new(), Metadata::default()));
        };

        let rows = self
            .executor
            .query(&stmt, self.timeout)
            .map_err(|err| self.fail("search", None, err))?;

        let mut total = 0;
        let mut snips = Vec::with_capacity(rows.len());
        for row in &rows {
            total = row.get_i64(0).map_err(|err| self.fail("search", None, err))?;
            snips.push(snip_from_row(row, 1).map_err(|err| self.fail("search", None, err))?);
        }

        let metadata = calculate_metadata(total, filters.page(), filters.page_size());
        debug!(
            returned = snips.len(),
            total,
            page = filters.page(),
            sort = filters.sort(),
            "search complete"
        );
        Ok((snips, metadata))
    }

    /// Cheap round trip used by health checks.
    pub fn ping(&self) -> Result<()> {
        self.executor
            .query_scalar(&Statement::new("SELECT 1"), self.timeout)
            .map(|_| ())
            .map_err(|err| self.fail("ping", None, err))
    }

    fn query_row(
        &self,
        op: &'static str,
        id: Option<i64>,
        stmt: &Statement,
    ) -> Result<Option<Row>> {
        self.executor
            .query_row(stmt, self.timeout)
            .map_err(|err| self.fail(op, id, err))
    }

    fn fail(&self, op: &'static str, id: Option<i64>, err: StoreError) -> SnipError {
        if err.is_timeout() {
            error!(op, ?id, timeout = ?self.timeout, "store operation timed out");
        } else {
            error!(op, ?id, error = %err, "store operation failed");
        }
        SnipError::Store(err)
    }
}

fn read_assigned(row: &Row) -> std::result::Result<(i64, DateTime<Utc>, i32), StoreError> {
    Ok((row.get_i64(0)?, row.get_timestamp(1)?, row.get_i32(2)?))
}

/// Decodes the [`SNIP_COLUMNS`] starting at column `start`.
pub(crate) fn snip_from_row(row: &Row, start: usize) -> std::result::Result<Snip, StoreError> {
    Ok(Snip {
        id: row.get_i64(start)?,
        created_at: row.get_timestamp(start + 1)?,
        title: row.get_text(start + 2)?.to_string(),
        content: row.get_text(start + 3)?.to_string(),
        tags: row.get_text_list(start + 4)?,
        version: row.get_i32(start + 5)?,
    })
}
