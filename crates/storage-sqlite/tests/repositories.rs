//! Integration tests against a real on-disk SQLite database.

use std::sync::Arc;

use chrono::Utc;
use marketlens_core::notes::{Note, NoteRepositoryTrait};
use marketlens_core::watchlists::{WatchlistItem, WatchlistRepositoryTrait};
use marketlens_market_data::KvStore;
use marketlens_storage_sqlite::{
    create_pool, run_migrations, DbPool, NoteRepository, SqliteKvStore, WatchlistRepository,
};
use tempfile::TempDir;
use uuid::Uuid;

fn test_pool() -> (TempDir, Arc<DbPool>) {
    let dir = tempfile::tempdir().expect("temp dir");
    let db_path = dir.path().join("marketlens-test.db");
    let pool = create_pool(db_path.to_str().expect("utf-8 path")).expect("pool");
    run_migrations(&pool).expect("migrations");
    (dir, pool)
}

fn watchlist_item(symbol: &str) -> WatchlistItem {
    WatchlistItem {
        id: Uuid::new_v4().to_string(),
        symbol: symbol.to_string(),
        added_at: Utc::now(),
    }
}

fn note(symbol: &str, content: &str) -> Note {
    let now = Utc::now();
    Note {
        id: Uuid::new_v4().to_string(),
        symbol: symbol.to_string(),
        content: content.to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn kv_store_round_trips_and_lists_keys() {
    let (_dir, pool) = test_pool();
    let store = SqliteKvStore::new(pool);

    assert!(store.get("mlens_cache_quote_AAPL").unwrap().is_none());

    store.set("mlens_cache_quote_AAPL", r#"{"price":150}"#).unwrap();
    store.set("mlens_quota", r#"{"daily_count":3}"#).unwrap();

    assert_eq!(
        store.get("mlens_cache_quote_AAPL").unwrap().as_deref(),
        Some(r#"{"price":150}"#)
    );

    // Overwrite replaces the value
    store.set("mlens_cache_quote_AAPL", r#"{"price":151}"#).unwrap();
    assert_eq!(
        store.get("mlens_cache_quote_AAPL").unwrap().as_deref(),
        Some(r#"{"price":151}"#)
    );

    let mut keys = store.keys().unwrap();
    keys.sort();
    assert_eq!(keys, vec!["mlens_cache_quote_AAPL", "mlens_quota"]);

    store.remove("mlens_quota").unwrap();
    assert!(store.get("mlens_quota").unwrap().is_none());

    store.clear().unwrap();
    assert!(store.keys().unwrap().is_empty());
}

#[test]
fn kv_store_persists_across_pool_checkouts() {
    let (_dir, pool) = test_pool();

    let writer = SqliteKvStore::new(pool.clone());
    writer.set("mlens_quota", r#"{"daily_count":42}"#).unwrap();

    let reader = SqliteKvStore::new(pool);
    assert_eq!(
        reader.get("mlens_quota").unwrap().as_deref(),
        Some(r#"{"daily_count":42}"#)
    );
}

#[tokio::test]
async fn watchlist_repository_inserts_loads_and_deletes() {
    let (_dir, pool) = test_pool();
    let repository = WatchlistRepository::new(pool);

    repository.insert_item(watchlist_item("AAPL")).await.unwrap();
    repository.insert_item(watchlist_item("MSFT")).await.unwrap();

    let items = repository.load_items().unwrap();
    let symbols: Vec<&str> = items.iter().map(|item| item.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAPL", "MSFT"]);

    let removed = repository.delete_by_symbol("AAPL".to_string()).await.unwrap();
    assert_eq!(removed, 1);
    assert_eq!(repository.load_items().unwrap().len(), 1);

    // Deleting an absent symbol removes nothing
    let removed = repository.delete_by_symbol("AAPL".to_string()).await.unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn watchlist_repository_rejects_duplicate_symbols() {
    let (_dir, pool) = test_pool();
    let repository = WatchlistRepository::new(pool);

    repository.insert_item(watchlist_item("AAPL")).await.unwrap();
    let result = repository.insert_item(watchlist_item("AAPL")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn note_repository_crud_round_trip() {
    let (_dir, pool) = test_pool();
    let repository = NoteRepository::new(pool);

    let created = repository
        .insert_note(note("AAPL", "Strong quarter"))
        .await
        .unwrap();
    repository
        .insert_note(note("MSFT", "Azure growth"))
        .await
        .unwrap();

    let apple_notes = repository.load_notes_for_symbol("AAPL").unwrap();
    assert_eq!(apple_notes.len(), 1);
    assert_eq!(apple_notes[0].content, "Strong quarter");

    let updated = repository
        .update_note(created.id.clone(), "Revised view".to_string(), Utc::now())
        .await
        .unwrap();
    assert_eq!(updated.content, "Revised view");
    assert!(updated.updated_at >= created.updated_at);

    let deleted = repository.delete_note(created.id).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(repository.load_notes_for_symbol("AAPL").unwrap().is_empty());
}

#[tokio::test]
async fn note_repository_update_of_missing_note_is_not_found() {
    let (_dir, pool) = test_pool();
    let repository = NoteRepository::new(pool);

    let result = repository
        .update_note("missing-id".to_string(), "content".to_string(), Utc::now())
        .await;
    assert!(result.is_err());
}

#[test]
fn cache_store_round_trips_through_sqlite_backend() {
    let (_dir, pool) = test_pool();
    let store: Arc<dyn KvStore> = Arc::new(SqliteKvStore::new(pool));
    let cache = marketlens_market_data::CacheStore::new(store);

    cache.set(
        "quote_AAPL",
        &serde_json::json!({"price": 150}),
        marketlens_market_data::CacheCategory::Quote,
    );

    let hit: Option<serde_json::Value> = cache.get("quote_AAPL");
    assert_eq!(hit, Some(serde_json::json!({"price": 150})));
}
