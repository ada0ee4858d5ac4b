//! Integration tests for shelf-core
//!
//! These tests exercise the full seed → clone → add items → search/analytics
//! workflow against a real SQLite database.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use shelf_core::{
    analytics::{Clock, InsightValue, Period},
    db::Database,
    gateway::DatabaseGateway,
    history::{FileHistoryStore, HistoryStore, MemoryHistoryStore},
    models::{ItemData, NewItem},
    search::{SearchEngine, SearchFilters, SortBy},
    AnalyticsEngine,
};

struct Library {
    db: Database,
    books: i64,
    movies: i64,
}

/// Alice owns Books and Movies (cloned from templates) with a few items
fn library() -> Library {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    db.seed_templates().expect("Failed to seed templates");

    let templates = db.list_templates().unwrap();
    let template = |name: &str| templates.iter().find(|t| t.name == name).unwrap().id;
    let books = db.clone_template("alice", template("Books"), None).unwrap().id;
    let movies = db.clone_template("alice", template("Movies"), None).unwrap().id;

    let base = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap();
    let entries = [
        (books, json!({"title": "Dune", "author": "Frank Herbert", "rating": 5, "status": "Completed", "tags": ["scifi"]}), 0),
        (books, json!({"title": "Foundation", "author": "Isaac Asimov", "rating": 3, "status": "Reading"}), 1),
        (books, json!({"title": "Dune Messiah", "author": "Frank Herbert", "rating": 4}), 2),
        (movies, json!({"title": "Dune", "year": 2021, "rating": 4, "watched": true}), 3),
    ];
    for (category, data, day) in entries {
        db.create_item_at(
            "alice",
            category,
            &NewItem::from_data(ItemData::from(data)),
            base + Duration::days(day),
        )
        .unwrap();
    }

    // Another user's data never shows up
    let bob_books = db.clone_template("bob", template("Books"), None).unwrap().id;
    db.create_item("bob", bob_books, &NewItem::from_data(ItemData::new().with("title", "Dune")))
        .unwrap();

    Library { db, books, movies }
}

fn search_engine(db: &Database) -> (SearchEngine, Arc<MemoryHistoryStore>) {
    let history = Arc::new(MemoryHistoryStore::new());
    let gateway = Arc::new(DatabaseGateway::new(db.clone(), "alice"));
    (SearchEngine::new(gateway, history.clone()), history)
}

// =============================================================================
// Search Integration Tests
// =============================================================================

#[tokio::test]
async fn test_search_across_categories() {
    let lib = library();
    let (engine, history) = search_engine(&lib.db);

    let response = engine.search("dune", SearchFilters::default()).await.unwrap();
    assert_eq!(response.total_count, 3);
    assert!(response.results.iter().all(|r| r.item.owner == "alice"));
    assert!(response.results.iter().all(|r| r.rank == 3));
    assert_eq!(history.get(), vec!["dune"]);

    let herbert = engine.search("herbert", SearchFilters::default()).await.unwrap();
    assert_eq!(herbert.total_count, 2);
    assert!(herbert.results.iter().all(|r| r.matched_fields == vec!["author"]));
}

#[tokio::test]
async fn test_search_with_filters() {
    let lib = library();
    let (engine, _) = search_engine(&lib.db);

    let movies_only = engine
        .search_by_category(lib.movies, "dune", SearchFilters::default())
        .await
        .unwrap();
    assert_eq!(movies_only.len(), 1);
    assert_eq!(movies_only[0].category.name, "Movies");

    let top_rated = SearchFilters {
        category_ids: Some(vec![lib.books]),
        rating_min: Some(4.0),
        sort_by: SortBy::RatingAsc,
        ..Default::default()
    };
    let response = engine.search("dune herbert", top_rated).await.unwrap();
    let titles: Vec<_> = response
        .results
        .iter()
        .map(|r| r.item.data.string("title").unwrap())
        .collect();
    assert_eq!(titles, vec!["Dune Messiah", "Dune"]);

    let base = Utc.with_ymd_and_hms(2024, 4, 1, 10, 0, 0).unwrap();
    let day_two = SearchFilters {
        date_from: Some(base + Duration::days(1)),
        date_to: Some(base + Duration::days(2)),
        ..Default::default()
    };
    let response = engine.search("frank isaac", day_two).await.unwrap();
    assert_eq!(response.total_count, 2);
}

#[tokio::test]
async fn test_history_file_persists_between_engines() {
    let lib = library();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recent.json");
    let gateway = Arc::new(DatabaseGateway::new(lib.db.clone(), "alice"));

    let first = SearchEngine::new(gateway.clone(), Arc::new(FileHistoryStore::new(&path)));
    first.search("dune", SearchFilters::default()).await.unwrap();
    first.search("asimov", SearchFilters::default()).await.unwrap();

    let second = SearchEngine::new(gateway, Arc::new(FileHistoryStore::new(&path)));
    assert_eq!(second.recent_searches(), vec!["asimov", "dune"]);
    assert_eq!(second.suggest("DU").len(), 1);

    second.clear_recent_searches().unwrap();
    assert!(first.recent_searches().is_empty());
}

// =============================================================================
// Analytics Integration Tests
// =============================================================================

#[tokio::test]
async fn test_analytics_over_database() {
    let lib = library();
    let now = Utc.with_ymd_and_hms(2024, 4, 4, 18, 0, 0).unwrap();
    let gateway = Arc::new(DatabaseGateway::new(lib.db.clone(), "alice"));
    let engine = AnalyticsEngine::new(gateway).with_clock(Clock::Fixed(now));

    let data = engine.all_analytics(Period::Week).await.unwrap();

    assert_eq!(data.overall_stats.total_categories, 2);
    assert_eq!(data.overall_stats.total_items, 4);
    assert_eq!(data.overall_stats.categories_with_items, 2);

    assert_eq!(data.time_series.len(), 8);
    let tail: Vec<_> = data.time_series[4..].iter().map(|p| p.count).collect();
    assert_eq!(tail, vec![1, 1, 1, 1]);

    assert_eq!(data.category_distribution[0].category_name, "Books");
    assert_eq!(data.category_distribution[0].count, 3);
    assert_eq!(data.category_distribution[0].category_icon, "📚");

    let ratings: Vec<_> = data.rating_distribution.iter().map(|r| r.count).collect();
    assert_eq!(ratings, vec![0, 0, 1, 2, 1]);

    let streak = data
        .insights
        .iter()
        .find(|i| i.title == "Current Streak")
        .unwrap();
    assert_eq!(streak.value, InsightValue::Text("4 days".to_string()));

    let completion = data
        .insights
        .iter()
        .find(|i| i.title == "Completion Rate")
        .unwrap();
    assert_eq!(completion.value, InsightValue::Text("50%".to_string()));
}

#[tokio::test]
async fn test_analytics_for_new_user() {
    let lib = library();
    let gateway = Arc::new(DatabaseGateway::new(lib.db.clone(), "carol"));
    let engine = AnalyticsEngine::new(gateway);

    let stats = engine.overall_stats().await.unwrap();
    assert_eq!(stats.total_categories, 0);
    assert_eq!(stats.average_items_per_category, 0.0);
    assert!(engine.insights().await.unwrap().is_empty());
    assert_eq!(engine.rating_distribution().await.unwrap().len(), 5);
}
