//! Search statement planning.
//!
//! Builds one statement that returns a page of snips with the total match
//! count on every row (`count(*) OVER ()`), so a page and its metadata come
//! from a single round trip.
//!
//! Predicates are only emitted when active, and every client value is bound.
//! The only interpolated identifiers are the sort column and direction, which
//! come from the safelist through [`Filters`].

use super::executor::{SqlValue, Statement};
use crate::filters::Filters;

/// Columns decoded by [`super::snip_from_row`], in order.
pub(crate) const SNIP_COLUMNS: &str = "id, created_at, title, content, tags, version";

const SEARCH_COLUMNS: &str =
    "count(*) OVER (), s.id, s.created_at, s.title, s.content, s.tags, s.version";

const TITLE_PREDICATE: &str =
    "s.id IN (SELECT rowid FROM snips_title_fts WHERE snips_title_fts MATCH ?)";

const TAGS_PREDICATE: &str = "(SELECT count(*) FROM snip_tags AS t \
     WHERE t.snip_id = s.id AND t.tag IN (SELECT value FROM json_each(?))) = ?";

/// How a title term restricts the result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleFilter {
    /// No term given.
    Any,
    /// FTS5 query requiring every token.
    Match(String),
    /// A term with no searchable tokens.
    Nothing,
}

/// Quotes each whitespace-separated piece of `title` as an FTS5 string and
/// ANDs them, leaving word splitting to the index tokenizer.
///
/// Quoting keeps FTS5 operators (`OR`, `NEAR`, `*`, `:`) in client input
/// from being interpreted. Pieces without a letter or digit add no tokens
/// and are dropped.
pub fn title_filter(title: &str) -> TitleFilter {
    if title.trim().is_empty() {
        return TitleFilter::Any;
    }

    let phrases: Vec<String> = title
        .split_whitespace()
        .filter(|piece| piece.chars().any(char::is_alphanumeric))
        .map(|piece| format!("\"{}\"", piece.replace('"', "\"\"")))
        .collect();

    if phrases.is_empty() {
        TitleFilter::Nothing
    } else {
        TitleFilter::Match(phrases.join(" "))
    }
}

/// Wanted tags with repeats removed, first occurrence order kept.
fn distinct_tags(tags: &[String]) -> Vec<String> {
    let mut seen = Vec::with_capacity(tags.len());
    for tag in tags {
        if !seen.contains(tag) {
            seen.push(tag.clone());
        }
    }
    seen
}

/// Plans a search. `None` means no snip can match and the store can be skipped.
pub fn plan_search(title: &str, tags: &[String], filters: &Filters) -> Option<Statement> {
    let mut predicates = Vec::new();
    let mut params: Vec<SqlValue> = Vec::new();

    match title_filter(title) {
        TitleFilter::Any => {}
        TitleFilter::Nothing => return None,
        TitleFilter::Match(query) => {
            predicates.push(TITLE_PREDICATE);
            params.push(SqlValue::Text(query));
        }
    }

    let wanted = distinct_tags(tags);
    if !wanted.is_empty() {
        let count = wanted.len() as i64;
        predicates.push(TAGS_PREDICATE);
        params.push(SqlValue::TextList(wanted));
        params.push(SqlValue::Integer(count));
    }

    let where_clause = if predicates.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", predicates.join(" AND "))
    };

    let sql = format!(
        "SELECT {SEARCH_COLUMNS} FROM snips AS s{where_clause} \
         ORDER BY s.{column} {direction}, s.id ASC LIMIT ? OFFSET ?",
        column = filters.sort_column(),
        direction = filters.sort_direction(),
    );

    params.push(SqlValue::Integer(filters.limit()));
    params.push(SqlValue::Integer(filters.offset()));

    Some(
        params
            .into_iter()
            .fold(Statement::new(sql), |stmt, param| stmt.bind(param)),
    )
}
