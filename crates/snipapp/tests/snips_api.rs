use snipapp::api::SnipApi;
use snipapp::commands::list::ListParams;
use snipapp::config::DatabaseConfig;
use snipapp::error::SnipError;
use snipapp::model::{Snip, SnipInput};
use snipapp::store::sqlite::SqliteExecutor;
use snipapp::store::SnipStore;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

fn setup() -> (TempDir, SnipApi<SqliteExecutor>) {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        max_open_conns: 4,
        max_idle_conns: 2,
        ..DatabaseConfig::at(dir.path().join("snips.db"))
    };
    let executor = SqliteExecutor::open(&config).unwrap();
    let api = SnipApi::new(SnipStore::new(executor, config.query_timeout()));
    (dir, api)
}

fn input(title: &str, content: &str, tags: &[&str]) -> SnipInput {
    SnipInput {
        title: Some(title.to_string()),
        content: Some(content.to_string()),
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
    }
}

#[test]
fn insert_then_fetch_round_trips() {
    let (_dir, api) = setup();
    let created = api.create_snip(input("t", "c", &["x", "y"])).unwrap();

    let fetched = api.show_snip(&created.id.to_string()).unwrap();
    assert_eq!(fetched, created);
    assert_eq!(
        fetched,
        Snip {
            id: created.id,
            created_at: created.created_at,
            version: 1,
            ..Snip::new("t", "c", vec!["x".into(), "y".into()])
        }
    );
}

#[test]
fn versioned_update_then_stale_retry() {
    let (_dir, api) = setup();
    let created = api.create_snip(input("t", "c", &["x", "y"])).unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.version, 1);

    let change = SnipInput {
        content: Some("c2".into()),
        ..Default::default()
    };

    let updated = api.update_snip("1", change.clone(), Some(1)).unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.content, "c2");
    assert_eq!(updated.title, "t");
    assert_eq!(updated.tags, vec!["x", "y"]);

    let retry = api.update_snip("1", change, Some(1));
    assert!(matches!(retry, Err(SnipError::EditConflict)));

    let stored = api.show_snip("1").unwrap();
    assert_eq!(stored, updated);
}

#[test]
fn racing_updates_have_one_winner() {
    let (_dir, api) = setup();
    api.create_snip(input("t", "c", &[])).unwrap();
    let api = Arc::new(api);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let api = Arc::clone(&api);
            thread::spawn(move || {
                api.update_snip(
                    "1",
                    SnipInput {
                        content: Some(format!("writer {i}")),
                        ..Default::default()
                    },
                    Some(1),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(err, SnipError::EditConflict) || err.is_timeout(),
                "unexpected error: {err:?}"
            );
        }
    }
    assert_eq!(api.show_snip("1").unwrap().version, 2);
}

#[test]
fn delete_missing_and_repeat_are_not_found() {
    let (_dir, api) = setup();
    assert!(matches!(api.delete_snip("42"), Err(SnipError::NotFound)));

    api.create_snip(input("t", "", &[])).unwrap();
    api.delete_snip("1").unwrap();
    assert!(matches!(api.delete_snip("1"), Err(SnipError::NotFound)));
}

#[test]
fn validation_reports_all_fields() {
    let (_dir, api) = setup();
    let err = api
        .create_snip(SnipInput {
            title: Some("x".repeat(1001)),
            content: Some("c".repeat(100_001)),
            tags: Some((0..11).map(|i| i.to_string()).collect()),
        })
        .unwrap_err();

    let errors = err.field_errors().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors.get("title").unwrap(),
        "must not be more than 1000 bytes long"
    );
    assert_eq!(
        errors.get("tags").unwrap(),
        "must not contain more than 10 tags"
    );
}

#[test]
fn default_list_returns_everything_in_id_order() {
    let (_dir, api) = setup();
    for title in ["zeta", "alpha", "mid"] {
        api.create_snip(input(title, "", &[])).unwrap();
    }

    let page = api.list_snips(&ListParams::default()).unwrap();
    let ids: Vec<i64> = page.snips.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(page.metadata.total_records, 3);
    assert_eq!(page.metadata.current_page, 1);
    assert_eq!(page.metadata.first_page, 1);
    assert_eq!(page.metadata.last_page, 1);
    assert_eq!(page.metadata.page_size, 20);
}

#[test]
fn list_filters_sort_and_paginate_together() {
    let (_dir, api) = setup();
    api.create_snip(input("Rust lifetimes", "", &["rust", "lang"])).unwrap();
    api.create_snip(input("Rust traits", "", &["rust"])).unwrap();
    api.create_snip(input("Rust async", "", &["rust", "lang"])).unwrap();
    api.create_snip(input("Shopping", "", &["lang"])).unwrap();

    let params = ListParams {
        title: Some("rust".into()),
        tags: Some("lang,rust".into()),
        sort: Some("title".into()),
        page_size: Some("1".into()),
        page: Some("2".into()),
    };
    let page = api.list_snips(&params).unwrap();

    assert_eq!(page.snips.len(), 1);
    assert_eq!(page.snips[0].title, "Rust lifetimes");
    assert_eq!(page.metadata.total_records, 2);
    assert_eq!(page.metadata.last_page, 2);
    assert_eq!(page.metadata.current_page, 2);
}

#[test]
fn list_rejects_unknown_sort() {
    let (_dir, api) = setup();
    let params = ListParams {
        sort: Some("content".into()),
        ..Default::default()
    };
    let err = api.list_snips(&params).unwrap_err();
    assert_eq!(
        err.field_errors().unwrap().get("sort").unwrap(),
        "invalid sort value"
    );
}

#[test]
fn data_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        max_idle_conns: 1,
        ..DatabaseConfig::at(dir.path().join("nested").join("snips.db"))
    };

    {
        let executor = SqliteExecutor::open(&config).unwrap();
        let api = SnipApi::new(SnipStore::new(executor, config.query_timeout()));
        api.create_snip(input("kept", "", &["t"])).unwrap();
    }

    let executor = SqliteExecutor::open(&config).unwrap();
    let api = SnipApi::new(SnipStore::new(executor, config.query_timeout()));
    let page = api
        .list_snips(&ListParams {
            tags: Some("t".into()),
            title: Some("kept".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(page.snips.len(), 1);
    assert_eq!(page.snips[0].title, "kept");
}
