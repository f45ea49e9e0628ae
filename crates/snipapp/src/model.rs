//! # Domain Model: Snips
//!
//! A [`Snip`] is a titled text note with an ordered list of tags.
//!
//! ## Identity and Versioning
//!
//! `id`, `created_at` and `version` are assigned by the store on insert
//! (`version` starts at 1). Clients never set `version`; the store bumps it by
//! exactly one on every successful update and uses it as the optimistic
//! concurrency token.
//!
//! ## Field Rules
//!
//! | Field     | Rule                                                      |
//! |-----------|-----------------------------------------------------------|
//! | `title`   | required, at most 1000 bytes                              |
//! | `content` | at most 100000 bytes, may be empty                        |
//! | `tags`    | at most 10 entries, no empty entries, no exact duplicates |
//!
//! Lengths are measured in bytes of UTF-8, not characters.

use crate::validator::{unique, Validator};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_TITLE_BYTES: usize = 1000;
pub const MAX_CONTENT_BYTES: usize = 100_000;
pub const MAX_TAGS: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snip {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub version: i32,
}

impl Snip {
    /// A snip that has not been stored yet: no id, no version.
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags,
            ..Default::default()
        }
    }
}

/// Client-supplied fields for create and partial update.
///
/// `None` leaves the field untouched on update and empty on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnipInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl SnipInput {
    pub fn into_snip(self) -> Snip {
        Snip::new(
            self.title.unwrap_or_default(),
            self.content.unwrap_or_default(),
            self.tags.unwrap_or_default(),
        )
    }

    /// Overwrites the fields of `snip` that this input carries.
    pub fn apply_to(self, snip: &mut Snip) {
        if let Some(title) = self.title {
            snip.title = title;
        }
        if let Some(content) = self.content {
            snip.content = content;
        }
        if let Some(tags) = self.tags {
            snip.tags = tags;
        }
    }
}

/// Records every rule violation of `snip` on `v`.
pub fn validate_snip(v: &mut Validator, snip: &Snip) {
    v.check(!snip.title.is_empty(), "title", "must be provided");
    v.check(
        snip.title.len() <= MAX_TITLE_BYTES,
        "title",
        "must not be more than 1000 bytes long",
    );

    v.check(
        snip.content.len() <= MAX_CONTENT_BYTES,
        "content",
        "must not be more than 100000 bytes long",
    );

    v.check(
        snip.tags.len() <= MAX_TAGS,
        "tags",
        "must not contain more than 10 tags",
    );
    v.check(unique(&snip.tags), "tags", "must not contain duplicate values");
    v.check(
        snip.tags.iter().all(|tag| !tag.is_empty()),
        "tags",
        "must not contain empty values",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|t| t.to_string()).collect()
    }

    fn errors_for(snip: &Snip) -> Validator {
        let mut v = Validator::new();
        validate_snip(&mut v, snip);
        v
    }

    #[test]
    fn valid_snip_passes() {
        let snip = Snip::new("Title", "", tags(&["x", "y"]));
        assert!(errors_for(&snip).valid());
    }

    #[test]
    fn limits_are_inclusive() {
        let snip = Snip::new(
            "t".repeat(MAX_TITLE_BYTES),
            "c".repeat(MAX_CONTENT_BYTES),
            (0..MAX_TAGS).map(|i| format!("tag{i}")).collect(),
        );
        assert!(errors_for(&snip).valid());
    }

    #[test]
    fn rejects_empty_title() {
        let v = errors_for(&Snip::new("", "body", vec![]));
        assert_eq!(v.errors().get("title").unwrap(), "must be provided");
    }

    #[test]
    fn rejects_long_title_in_bytes() {
        // 334 three-byte characters is 1002 bytes
        let v = errors_for(&Snip::new("€".repeat(334), "", vec![]));
        assert_eq!(
            v.errors().get("title").unwrap(),
            "must not be more than 1000 bytes long"
        );
    }

    #[test]
    fn rejects_long_content() {
        let v = errors_for(&Snip::new("t", "c".repeat(MAX_CONTENT_BYTES + 1), vec![]));
        assert!(v.errors().contains_key("content"));
    }

    #[test]
    fn rejects_duplicate_tags() {
        let v = errors_for(&Snip::new("t", "", tags(&["a", "a"])));
        assert_eq!(
            v.errors().get("tags").unwrap(),
            "must not contain duplicate values"
        );
    }

    #[test]
    fn duplicates_are_exact_matches() {
        assert!(errors_for(&Snip::new("t", "", tags(&["a", "A", "a "]))).valid());
    }

    #[test]
    fn rejects_empty_tag() {
        let v = errors_for(&Snip::new("t", "", tags(&["a", ""])));
        assert_eq!(
            v.errors().get("tags").unwrap(),
            "must not contain empty values"
        );
    }

    #[test]
    fn rejects_eleven_tags() {
        let eleven = (0..11).map(|i| format!("t{i}")).collect();
        let v = errors_for(&Snip::new("t", "", eleven));
        assert_eq!(
            v.errors().get("tags").unwrap(),
            "must not contain more than 10 tags"
        );
    }

    #[test]
    fn reports_every_field_in_one_pass() {
        let v = errors_for(&Snip::new(
            "",
            "c".repeat(MAX_CONTENT_BYTES + 1),
            tags(&["", ""]),
        ));
        assert_eq!(v.errors().len(), 3);
    }

    #[test]
    fn input_applies_only_present_fields() {
        let mut snip = Snip::new("t", "c", tags(&["x", "y"]));
        SnipInput {
            content: Some("c2".into()),
            ..Default::default()
        }
        .apply_to(&mut snip);

        assert_eq!(snip.title, "t");
        assert_eq!(snip.content, "c2");
        assert_eq!(snip.tags, tags(&["x", "y"]));
    }

    #[test]
    fn input_into_snip_defaults_missing_fields() {
        let snip = SnipInput {
            title: Some("t".into()),
            ..Default::default()
        }
        .into_snip();
        assert_eq!(snip.id, 0);
        assert_eq!(snip.version, 0);
        assert!(snip.content.is_empty());
        assert!(snip.tags.is_empty());
    }

    #[test]
    fn serialization_omits_empty_content_and_tags() {
        let snip = Snip::new("t", "", vec![]);
        let json = serde_json::to_value(&snip).unwrap();
        assert!(json.get("content").is_none());
        assert!(json.get("tags").is_none());
        assert_eq!(json["title"], "t");
    }
}
