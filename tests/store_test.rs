// SPDX-License-Identifier: MIT
// Task store integration tests. Each test opens a fresh SQLite
// database in its own tempdir.

use chrono::{Duration, Utc};
use taskrd::error::TaskError;
use taskrd::store::TaskStore;

async fn test_store() -> TaskStore {
    let data_dir = tempfile::tempdir().unwrap().keep();
    TaskStore::new(&data_dir).await.unwrap()
}

// ─── create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_derives_due_soon_within_window() {
    let store = test_store().await;
    let task = store
        .create_task(
            "Write report",
            "quarterly numbers",
            Utc::now() + Duration::days(1),
        )
        .await
        .unwrap();
    assert!(!task.id.is_empty());
    assert_eq!(task.name, "Write report");
    assert_eq!(task.description, "quarterly numbers");
    assert_eq!(task.status, "Due soon");
}

#[tokio::test]
async fn create_derives_overdue_for_past_due() {
    let store = test_store().await;
    let task = store
        .create_task("File taxes", "", Utc::now() - Duration::days(1))
        .await
        .unwrap();
    assert_eq!(task.status, "Overdue");
}

#[tokio::test]
async fn create_derives_not_urgent_beyond_window() {
    let store = test_store().await;
    let task = store
        .create_task("Renew passport", "", Utc::now() + Duration::days(30))
        .await
        .unwrap();
    assert_eq!(task.status, "Not urgent");
}

#[tokio::test]
async fn create_rejects_empty_name_and_persists_nothing() {
    let store = test_store().await;
    let err = store.create_task("", "desc", Utc::now()).await.unwrap_err();
    match err {
        TaskError::Validation(msg) => assert_eq!(msg, "Name and Due Date are required."),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.list_tasks().await.unwrap().is_empty());
}

#[tokio::test]
async fn created_tasks_get_distinct_ids() {
    let store = test_store().await;
    let a = store.create_task("a", "", Utc::now()).await.unwrap();
    let b = store.create_task("b", "", Utc::now()).await.unwrap();
    assert_ne!(a.id, b.id);
}

// ─── edit ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn edit_unknown_id_is_not_found() {
    let store = test_store().await;
    let err = store
        .edit_task("no-such-id", "Name", "", Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, TaskError::NotFound));
}

#[tokio::test]
async fn edit_recomputes_status_from_original_created_date() {
    let store = test_store().await;
    let task = store
        .create_task("Plan offsite", "", Utc::now() + Duration::days(30))
        .await
        .unwrap();
    assert_eq!(task.status, "Not urgent");

    // Pull the due date into the past: Overdue, created_date untouched.
    let edited = store
        .edit_task(&task.id, "Plan offsite", "", Utc::now() - Duration::days(2))
        .await
        .unwrap();
    assert_eq!(edited.id, task.id);
    assert_eq!(edited.status, "Overdue");
    assert_eq!(edited.created_date, task.created_date);

    // And back inside the seven-day window: Due soon.
    let edited = store
        .edit_task(
            &task.id,
            "Plan offsite (moved)",
            "new venue",
            Utc::now() + Duration::days(3),
        )
        .await
        .unwrap();
    assert_eq!(edited.status, "Due soon");
    assert_eq!(edited.name, "Plan offsite (moved)");
    assert_eq!(edited.description, "new venue");
    assert_eq!(edited.created_date, task.created_date);
}

#[tokio::test]
async fn edit_rejects_empty_name() {
    let store = test_store().await;
    let task = store.create_task("Water plants", "", Utc::now()).await.unwrap();
    let err = store
        .edit_task(&task.id, "", "", Utc::now())
        .await
        .unwrap_err();
    match err {
        TaskError::Validation(msg) => assert_eq!(msg, "ID, Name and Due Date are required."),
        other => panic!("expected validation error, got {other:?}"),
    }
}

// ─── list ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_returns_newest_first() {
    let store = test_store().await;
    for name in ["first", "second", "third"] {
        store
            .create_task(name, "", Utc::now() + Duration::days(1))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(15)).await;
    }
    let tasks = store.list_tasks().await.unwrap();
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["third", "second", "first"]);
}

// ─── search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_matches_substring_case_insensitively() {
    let store = test_store().await;
    for name in ["Write Report", "report review", "Walk the dog"] {
        store.create_task(name, "", Utc::now()).await.unwrap();
    }
    let hits = store.search_tasks("REPORT").await.unwrap();
    let names: Vec<&str> = hits.iter().map(|t| t.name.as_str()).collect();
    // Ordered by name; uppercase sorts before lowercase in SQLite's default collation.
    assert_eq!(names, ["Write Report", "report review"]);
}

#[tokio::test]
async fn search_empty_pattern_matches_all() {
    let store = test_store().await;
    for name in ["a", "b"] {
        store.create_task(name, "", Utc::now()).await.unwrap();
    }
    assert_eq!(store.search_tasks("").await.unwrap().len(), 2);
}

#[tokio::test]
async fn search_treats_like_metacharacters_literally() {
    let store = test_store().await;
    for name in ["100% done", "100x done", "a_b", "axb"] {
        store.create_task(name, "", Utc::now()).await.unwrap();
    }
    let hits = store.search_tasks("100%").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "100% done");

    let hits = store.search_tasks("a_b").await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "a_b");
}

// ─── count ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn count_tracks_inserts() {
    let store = test_store().await;
    assert_eq!(store.count_tasks().await.unwrap(), 0);
    store.create_task("one", "", Utc::now()).await.unwrap();
    store.create_task("two", "", Utc::now()).await.unwrap();
    assert_eq!(store.count_tasks().await.unwrap(), 2);
}

// ─── pool ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pool_serves_auxiliary_queries() {
    let store = test_store().await;
    store.create_task("one", "", Utc::now()).await.unwrap();
    let pool = store.pool();

    let (mode,): (String,) = sqlx::query_as("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mode, "wal");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
