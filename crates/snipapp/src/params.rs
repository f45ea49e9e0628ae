//! Helpers for turning raw request parameters into typed values.
//!
//! Request handlers hand these the undecoded strings they received (query
//! values, path segments, CLI arguments). An absent or empty value always
//! means "use the default".

use crate::error::{Result, SnipError};
use crate::validator::Validator;

pub fn read_string(raw: Option<&str>, default: &str) -> String {
    match raw {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => default.to_string(),
    }
}

/// Splits a comma-separated value. Blank items are dropped.
pub fn read_csv(raw: Option<&str>, default: &[&str]) -> Vec<String> {
    match raw {
        Some(s) if !s.is_empty() => s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect(),
        _ => default.iter().map(|item| item.to_string()).collect(),
    }
}

/// Parses an integer, recording an error under `key` and returning `default` if it is not one.
pub fn read_int(v: &mut Validator, key: &str, raw: Option<&str>, default: i64) -> i64 {
    match raw {
        Some(s) if !s.is_empty() => match s.trim().parse() {
            Ok(n) => n,
            Err(_) => {
                v.add_error(key, "must be an integer value");
                default
            }
        },
        _ => default,
    }
}

/// Parses a record id. Anything that cannot name a stored snip is [`SnipError::NotFound`].
pub fn read_id(raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(SnipError::NotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_string() {
        assert_eq!(read_string(Some("rust"), ""), "rust");
        assert_eq!(read_string(Some(""), "fallback"), "fallback");
        assert_eq!(read_string(None, ""), "");
    }

    #[test]
    fn test_read_csv() {
        assert_eq!(read_csv(Some("go,rust"), &[]), vec!["go", "rust"]);
        assert_eq!(read_csv(Some(" go , ,rust,"), &[]), vec!["go", "rust"]);
        assert_eq!(read_csv(None, &["x"]), vec!["x"]);
        assert!(read_csv(Some(""), &[]).is_empty());
    }

    #[test]
    fn read_int_parses_and_defaults() {
        let mut v = Validator::new();
        assert_eq!(read_int(&mut v, "page", Some("3"), 1), 3);
        assert_eq!(read_int(&mut v, "page", Some("-4"), 1), -4);
        assert_eq!(read_int(&mut v, "page", None, 1), 1);
        assert_eq!(read_int(&mut v, "page", Some(""), 1), 1);
        assert!(v.valid());
    }

    #[test]
    fn read_int_records_error() {
        let mut v = Validator::new();
        assert_eq!(read_int(&mut v, "page_size", Some("ten"), 20), 20);
        assert_eq!(
            v.errors().get("page_size").unwrap(),
            "must be an integer value"
        );
    }

    #[test]
    fn test_read_id() {
        assert_eq!(read_id("42").unwrap(), 42);
        assert!(matches!(read_id("0"), Err(SnipError::NotFound)));
        assert!(matches!(read_id("-3"), Err(SnipError::NotFound)));
        assert!(matches!(read_id("abc"), Err(SnipError::NotFound)));
        assert!(matches!(read_id(""), Err(SnipError::NotFound)));
    }
}
