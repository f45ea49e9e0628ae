use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Field name to the first human-readable message recorded for it.
pub type FieldErrors = BTreeMap<String, String>;

/// Failures raised by the backing store.
///
/// `Timeout` is kept apart from the rest: when it is returned the store may or
/// may not have applied the statement, so callers must not assume a write did
/// not happen.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("malformed row: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, StoreError::Timeout(_))
    }
}

#[derive(Error, Debug)]
pub enum SnipError {
    #[error("failed validation: {}", describe_fields(.0))]
    Validation(FieldErrors),

    #[error("the requested resource could not be found")]
    NotFound,

    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(#[from] confique::Error),
}

impl SnipError {
    /// True when the failure came from a store call that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SnipError::Store(err) if err.is_timeout())
    }

    /// Field errors carried by a validation failure, if this is one.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SnipError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

fn describe_fields(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field} {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, SnipError>;
