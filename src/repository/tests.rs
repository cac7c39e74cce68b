//! Repository Integration Tests
//!
//! Tests for TaskRepository and SettingsRepository with an in-memory
//! SQLite database.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::{DomainError, Task};
use crate::repository::{
    init_db, Repository, SearchableRepository, SettingsRepository, TaskRepository,
    HAS_LAUNCHED_BEFORE,
};

async fn setup_test_db() -> TaskRepository {
    let db_path = PathBuf::from(":memory:");
    let conn = init_db(&db_path).await.expect("Failed to init test DB");
    TaskRepository::new(Arc::new(Mutex::new(conn)))
}

fn task(title: &str, entry: &str) -> Task {
    Task::new(0, Some(title.to_string()), Some(entry.to_string()))
}

#[tokio::test]
async fn test_create_assigns_sequential_ids_from_one() {
    let repo = setup_test_db().await;

    let first = repo.create(&task("First", "")).await.expect("create");
    let second = repo.create(&task("Second", "")).await.expect("create");

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
}

#[tokio::test]
async fn test_create_continues_after_seeded_ids() {
    let repo = setup_test_db().await;

    let mut seeded = task("Seeded", "");
    seeded.id = 42;
    repo.insert_batch(&[seeded]).await.expect("batch");

    let created = repo.create(&task("Next", "")).await.expect("create");
    assert_eq!(created.id, 43);
}

#[tokio::test]
async fn test_list_orders_by_creation_time() {
    let repo = setup_test_db().await;

    repo.create(&task("A", "")).await.unwrap();
    repo.create(&task("B", "")).await.unwrap();
    repo.create(&task("C", "")).await.unwrap();

    let tasks = repo.list().await.expect("list");
    let titles: Vec<_> = tasks.iter().map(|t| t.display_title()).collect();
    assert_eq!(titles, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_insert_batch_persists_all_records() {
    let repo = setup_test_db().await;

    let mut a = task("Task #1", "Buy milk");
    a.id = 1;
    let mut b = task("Task #2", "Walk dog");
    b.id = 2;
    b.completed = true;

    repo.insert_batch(&[a, b]).await.expect("batch");

    let tasks = repo.list().await.expect("list");
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].entry_text(), "Buy milk");
    assert!(tasks[1].completed);
}

#[tokio::test]
async fn test_update_changes_title_and_entry_only() {
    let repo = setup_test_db().await;

    let created = repo.create(&task("Original", "Body")).await.unwrap();
    let stored = repo.find_by_id(created.id).await.unwrap().unwrap();

    let mut edited = stored.clone();
    edited.title = Some("New".to_string());
    edited.entry = Some("New body".to_string());
    repo.update(&edited).await.expect("update");

    let after = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(after.title.as_deref(), Some("New"));
    assert_eq!(after.entry_text(), "New body");
    assert!(!after.completed);
    assert_eq!(
        after.date_created.map(|d| d.timestamp_millis()),
        stored.date_created.map(|d| d.timestamp_millis())
    );
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() {
    let repo = setup_test_db().await;
    repo.create(&task("Only", "")).await.unwrap();

    let mut ghost = task("Ghost", "");
    ghost.id = 99;
    let err = repo.update(&ghost).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(99)));

    // Store unchanged
    let tasks = repo.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].display_title(), "Only");
}

#[tokio::test]
async fn test_delete_removes_exactly_one() {
    let repo = setup_test_db().await;

    let a = repo.create(&task("Keep", "")).await.unwrap();
    let b = repo.create(&task("Drop", "")).await.unwrap();

    repo.delete(b.id).await.expect("delete");

    let tasks = repo.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, a.id);
}

#[tokio::test]
async fn test_delete_missing_id_is_not_found() {
    let repo = setup_test_db().await;
    repo.create(&task("Only", "")).await.unwrap();

    let err = repo.delete(123).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(123)));
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_blank_query_returns_full_list() {
    let repo = setup_test_db().await;

    repo.create(&task("A", "")).await.unwrap();
    repo.create(&task("B", "")).await.unwrap();

    let all = repo.list().await.unwrap();
    let blank = repo.search("   ").await.unwrap();

    assert_eq!(blank.len(), all.len());
    let ids: Vec<_> = blank.iter().map(|t| t.id).collect();
    assert_eq!(ids, all.iter().map(|t| t.id).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_search_matches_title_or_entry() {
    let repo = setup_test_db().await;

    repo.create(&task("Groceries", "milk and eggs")).await.unwrap();
    repo.create(&task("Chores", "sweep the floor")).await.unwrap();

    let by_title = repo.search("grocer").await.unwrap();
    assert_eq!(by_title.len(), 1);
    assert_eq!(by_title[0].display_title(), "Groceries");

    let by_entry = repo.search("floor").await.unwrap();
    assert_eq!(by_entry.len(), 1);
    assert_eq!(by_entry[0].display_title(), "Chores");
}

#[tokio::test]
async fn test_search_is_case_and_diacritic_insensitive() {
    let repo = setup_test_db().await;

    repo.create(&task("Out", "visit the café")).await.unwrap();
    repo.create(&task("Other", "nothing here")).await.unwrap();

    let matches = repo.search("CAFE").await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].entry_text(), "visit the café");

    // Accented query against unaccented text folds the same way
    let reverse = repo.search("nòthing").await.unwrap();
    assert_eq!(reverse.len(), 1);
}

#[tokio::test]
async fn test_search_preserves_order_among_matches() {
    let repo = setup_test_db().await;

    repo.create(&task("One", "shared word")).await.unwrap();
    repo.create(&task("Two", "unrelated")).await.unwrap();
    repo.create(&task("Three", "shared word again")).await.unwrap();

    let matches = repo.search("shared").await.unwrap();
    let titles: Vec<_> = matches.iter().map(|t| t.display_title()).collect();
    assert_eq!(titles, vec!["One", "Three"]);
}

#[tokio::test]
async fn test_launch_flag_defaults_false_and_persists() {
    let db_path = PathBuf::from(":memory:");
    let conn = init_db(&db_path).await.expect("init");
    let settings = SettingsRepository::new(Arc::new(Mutex::new(conn)));

    assert!(!settings.flag(HAS_LAUNCHED_BEFORE).await.unwrap());

    settings.set_flag(HAS_LAUNCHED_BEFORE, true).await.unwrap();
    assert!(settings.flag(HAS_LAUNCHED_BEFORE).await.unwrap());

    // Setting again is idempotent
    settings.set_flag(HAS_LAUNCHED_BEFORE, true).await.unwrap();
    assert!(settings.flag(HAS_LAUNCHED_BEFORE).await.unwrap());
}

#[tokio::test]
async fn test_store_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("tasks.db");

    {
        let conn = init_db(&db_path).await.expect("init");
        let repo = TaskRepository::new(Arc::new(Mutex::new(conn)));
        repo.create(&task("Durable", "still here")).await.unwrap();
    }

    let conn = init_db(&db_path).await.expect("reopen");
    let repo = TaskRepository::new(Arc::new(Mutex::new(conn)));
    let tasks = repo.list().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].display_title(), "Durable");
}
