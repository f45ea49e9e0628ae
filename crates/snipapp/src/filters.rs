//! # Paging and Sorting Filters
//!
//! Turns raw, client-supplied paging and sorting parameters into a bounded
//! [`Filters`] directive the query planner can trust.
//!
//! ## Sort Safelist
//!
//! The only defense against arbitrary identifiers reaching an `ORDER BY`
//! clause. A [`SortSafelist`] is a fixed, `'static` list of sort tokens chosen
//! by the deployment (e.g. `"title"`, `"-title"`). A client value is accepted
//! only when it equals one of those tokens, and the resolved column name is
//! always sliced out of the safelist entry, never out of the client string.
//!
//! A leading `-` selects descending order. Ascending and descending are
//! permitted independently: listing `"-created_at"` without `"created_at"`
//! allows only newest-first.
//!
//! ## Bounds
//!
//! | Parameter   | Default | Range            |
//! |-------------|---------|------------------|
//! | `page`      | 1       | 1 ..= 10,000,000 |
//! | `page_size` | 20      | 1 ..= 100        |
//!
//! The page ceiling keeps `offset()` far from overflow.

use crate::error::{Result, SnipError};
use crate::validator::Validator;
use serde::Serialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE: i64 = 10_000_000;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Fixed set of sort tokens a deployment permits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSafelist {
    tokens: &'static [&'static str],
    default_token: &'static str,
}

impl SortSafelist {
    /// `default_token` is used when the client sends no sort; it should be one of `tokens`.
    pub const fn new(tokens: &'static [&'static str], default_token: &'static str) -> Self {
        Self {
            tokens,
            default_token,
        }
    }

    pub fn tokens(&self) -> &'static [&'static str] {
        self.tokens
    }

    pub fn default_token(&self) -> &'static str {
        self.default_token
    }

    /// Looks `sort` up in the safelist. `None` on a miss.
    pub fn resolve(&self, sort: &str) -> Option<(&'static str, SortDirection)> {
        let token = self.tokens.iter().copied().find(|token| *token == sort)?;
        match token.strip_prefix('-') {
            Some(column) => Some((column, SortDirection::Desc)),
            None => Some((token, SortDirection::Asc)),
        }
    }
}

/// Validated paging and sorting directive for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    page: i64,
    page_size: i64,
    sort: String,
    column: &'static str,
    direction: SortDirection,
}

impl Filters {
    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    /// The sort token as the client sent it (or the default).
    pub fn sort(&self) -> &str {
        &self.sort
    }

    /// Trusted column name taken from the safelist.
    pub fn sort_column(&self) -> &'static str {
        self.column
    }

    pub fn sort_direction(&self) -> &'static str {
        self.direction.as_sql()
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

/// Validates raw paging/sorting input against `safelist`.
///
/// Absent values fall back to the defaults; an empty `sort` counts as absent.
/// Every failing parameter is recorded on `v`. Errors already present on `v`
/// (for instance from [`crate::params::read_int`]) also fail the call, so the
/// caller gets one validation error covering everything.
pub fn validate_filters(
    v: &mut Validator,
    page: Option<i64>,
    page_size: Option<i64>,
    sort: Option<&str>,
    safelist: &SortSafelist,
) -> Result<Filters> {
    let page = page.unwrap_or(DEFAULT_PAGE);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let sort = match sort {
        Some(s) if !s.is_empty() => s,
        _ => safelist.default_token(),
    };

    v.check(page > 0, "page", "must be greater than zero");
    v.check(page <= MAX_PAGE, "page", "must be a maximum of 10 million");
    v.check(page_size > 0, "page_size", "must be greater than zero");
    v.check(page_size <= MAX_PAGE_SIZE, "page_size", "must be a maximum of 100");

    let resolved = safelist.resolve(sort);
    v.check(resolved.is_some(), "sort", "invalid sort value");

    match resolved {
        Some((column, direction)) if v.valid() => Ok(Filters {
            page,
            page_size,
            sort: sort.to_string(),
            column,
            direction,
        }),
        _ => Err(SnipError::Validation(v.errors().clone())),
    }
}

/// Pagination summary of one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: i64,
    #[serde(skip_serializing_if = "is_zero")]
    pub total_records: i64,
}

fn is_zero(n: &i64) -> bool {
    *n == 0
}

/// Zero metadata when nothing matched; otherwise `last_page = ceil(total / page_size)`.
///
/// A non-positive `page_size` also yields zero metadata.
pub fn calculate_metadata(total_records: i64, page: i64, page_size: i64) -> Metadata {
    if total_records <= 0 || page_size <= 0 {
        return Metadata::default();
    }

    Metadata {
        current_page: page,
        page_size,
        first_page: 1,
        last_page: (total_records + page_size - 1) / page_size,
        total_records,
    }
}
