use crate::error::StoreError;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A value bound into, or read out of, a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    /// An array of strings. Backends without a native array type store it as JSON text.
    TextList(Vec<String>),
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Integer(n)
    }
}

impl From<i32> for SqlValue {
    fn from(n: i32) -> Self {
        SqlValue::Integer(n.into())
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<Vec<String>> for SqlValue {
    fn from(list: Vec<String>) -> Self {
        SqlValue::TextList(list)
    }
}

/// SQL text plus its positional parameters.
///
/// The SQL must only be assembled from fixed fragments; anything that came
/// from a client goes through [`Statement::bind`].
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    sql: String,
    params: Vec<SqlValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params
    }
}

/// One result row, columns in select order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, idx: usize) -> Result<&SqlValue, StoreError> {
        self.values
            .get(idx)
            .ok_or_else(|| StoreError::Decode(format!("no column {idx}")))
    }

    pub fn get_i64(&self, idx: usize) -> Result<i64, StoreError> {
        match self.get(idx)? {
            SqlValue::Integer(n) => Ok(*n),
            other => Err(unexpected(idx, "integer", other)),
        }
    }

    pub fn get_i32(&self, idx: usize) -> Result<i32, StoreError> {
        let n = self.get_i64(idx)?;
        i32::try_from(n).map_err(|_| StoreError::Decode(format!("column {idx}: {n} overflows i32")))
    }

    pub fn get_text(&self, idx: usize) -> Result<&str, StoreError> {
        match self.get(idx)? {
            SqlValue::Text(s) => Ok(s),
            other => Err(unexpected(idx, "text", other)),
        }
    }

    /// Accepts a native list or a JSON array stored as text.
    pub fn get_text_list(&self, idx: usize) -> Result<Vec<String>, StoreError> {
        match self.get(idx)? {
            SqlValue::TextList(list) => Ok(list.clone()),
            SqlValue::Text(json) => serde_json::from_str(json)
                .map_err(|e| StoreError::Decode(format!("column {idx}: {e}"))),
            SqlValue::Null => Ok(Vec::new()),
            other => Err(unexpected(idx, "text list", other)),
        }
    }

    /// Reads an RFC 3339 timestamp.
    pub fn get_timestamp(&self, idx: usize) -> Result<DateTime<Utc>, StoreError> {
        let text = self.get_text(idx)?;
        DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| StoreError::Decode(format!("column {idx}: {e}")))
    }
}

fn unexpected(idx: usize, wanted: &str, found: &SqlValue) -> StoreError {
    StoreError::Decode(format!("column {idx}: expected {wanted}, found {found:?}"))
}

/// Runs parameterized statements against the backing store.
///
/// Every call is bounded by `timeout`. Running out of time must surface as
/// [`StoreError::Timeout`] and nothing else.
pub trait Executor: Send + Sync {
    /// Runs a statement that returns rows.
    fn query(&self, stmt: &Statement, timeout: Duration) -> Result<Vec<Row>, StoreError>;

    /// Runs a statement and returns the number of rows it changed.
    fn execute(&self, stmt: &Statement, timeout: Duration) -> Result<usize, StoreError>;

    /// First row, if any.
    fn query_row(&self, stmt: &Statement, timeout: Duration) -> Result<Option<Row>, StoreError> {
        Ok(self.query(stmt, timeout)?.into_iter().next())
    }

    /// First column of the first row, if any.
    fn query_scalar(
        &self,
        stmt: &Statement,
        timeout: Duration,
    ) -> Result<Option<SqlValue>, StoreError> {
        match self.query_row(stmt, timeout)? {
            Some(row) => Ok(Some(row.get(0)?.clone())),
            None => Ok(None),
        }
    }
}
