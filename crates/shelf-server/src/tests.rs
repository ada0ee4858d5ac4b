//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use shelf_core::db::Database;
use shelf_core::models::{ItemData, NewItem};
use tower::ServiceExt;

const OWNER: &str = "local";

/// Router over a database with a Books and a Movies category for `OWNER`
fn setup_test_app() -> Router {
    let db = Database::in_memory().unwrap();
    db.seed_templates().unwrap();

    let templates = db.list_templates().unwrap();
    let template = |name: &str| templates.iter().find(|t| t.name == name).unwrap().id;
    let books = db.clone_template(OWNER, template("Books"), None).unwrap();
    let movies = db.clone_template(OWNER, template("Movies"), None).unwrap();

    for (category, data) in [
        (books.id, json!({"title": "Dune", "rating": 5, "status": "Completed", "tags": ["scifi"]})),
        (books.id, json!({"title": "Foundation", "rating": 3, "status": "Reading"})),
        (movies.id, json!({"title": "Dune: Part Two", "rating": 4})),
    ] {
        db.create_item(OWNER, category, &NewItem::from_data(ItemData::from(data)))
            .unwrap();
    }

    // Someone else's data must never appear
    let other = db.clone_template("bob", template("Books"), None).unwrap();
    db.create_item(
        "bob",
        other.id,
        &NewItem::from_data(ItemData::from(json!({"title": "Dune Messiah"}))),
    )
    .unwrap();

    create_router(db, None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn category_id(app: &Router, name: &str) -> i64 {
    let json = get_body_json(get(app, "/api/categories").await).await;
    json.as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .and_then(|c| c["id"].as_i64())
        .unwrap()
}

// ========== Search API Tests ==========

#[tokio::test]
async fn test_search_ranks_across_categories() {
    let app = setup_test_app();

    let response = get(&app, "/api/search?q=dune").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["query"], "dune");
    assert_eq!(json["total_count"], 2);

    let results = json["results"].as_array().unwrap();
    let titles: Vec<_> = results.iter().map(|r| r["item"]["data"]["title"].clone()).collect();
    assert!(titles.contains(&json!("Dune")));
    assert!(titles.contains(&json!("Dune: Part Two")));
    assert!(!titles.contains(&json!("Dune Messiah")));
    assert!(results.iter().all(|r| r["matched_fields"]
        .as_array()
        .unwrap()
        .contains(&json!("title"))));
}

#[tokio::test]
async fn test_search_empty_query() {
    let app = setup_test_app();

    let json = get_body_json(get(&app, "/api/search?q=").await).await;
    assert_eq!(json["total_count"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_with_filters() {
    let app = setup_test_app();
    let books = category_id(&app, "Books").await;

    let uri = format!("/api/search?q=dune&category_id={}&rating_min=4", books);
    let json = get_body_json(get(&app, &uri).await).await;
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["results"][0]["category"]["name"], "Books");
    assert_eq!(json["filters"]["category_ids"], json!([books]));

    let json = get_body_json(get(&app, "/api/search?q=dune&tag=scifi,horror").await).await;
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["results"][0]["item"]["data"]["title"], "Dune");

    let json = get_body_json(get(&app, "/api/search?q=dune&date_to=2000-01-01").await).await;
    assert_eq!(json["total_count"], 0);
}

#[tokio::test]
async fn test_search_sort_by_rating() {
    let app = setup_test_app();

    let json = get_body_json(get(&app, "/api/search?q=a&sort_by=rating_asc").await).await;
    let ratings: Vec<_> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["item"]["data"]["rating"].as_i64().unwrap())
        .collect();
    let mut sorted = ratings.clone();
    sorted.sort();
    assert_eq!(ratings, sorted);
    assert_eq!(json["filters"]["sort_by"], "rating_asc");
}

#[tokio::test]
async fn test_search_rejects_bad_params() {
    let app = setup_test_app();

    for uri in [
        "/api/search?q=dune&sort_by=popularity",
        "/api/search?q=dune&category_id=abc",
        "/api/search?q=dune&date_from=yesterday",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = get_body_json(response).await;
        assert!(json["error"].is_string());
    }
}

#[tokio::test]
async fn test_search_date_bounds_at_calendar_limits() {
    let app = setup_test_app();

    // No day follows the last representable date
    let response = get(&app, "/api/search?q=dune&date_to=%2B262142-12-31").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/search?q=dune&date_from=%2B262142-12-31").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["total_count"], 0);

    let response = get(&app, "/api/search?q=dune&date_to=%2B262142-12-30").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["total_count"], 2);
}

#[tokio::test]
async fn test_search_within_category() {
    let app = setup_test_app();
    let movies = category_id(&app, "Movies").await;

    let response = get(&app, &format!("/api/categories/{}/search?q=dune", movies)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let results = json.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["category"]["name"], "Movies");
}

#[tokio::test]
async fn test_recent_searches_and_suggestions() {
    let app = setup_test_app();

    for q in ["dune", "foundation", "dune"] {
        get(&app, &format!("/api/search?q={}", q)).await;
    }

    let json = get_body_json(get(&app, "/api/search/recent").await).await;
    assert_eq!(json, json!(["dune", "foundation"]));

    let json = get_body_json(get(&app, "/api/search/suggestions?q=FOUND").await).await;
    assert_eq!(json, json!([{"text": "foundation", "type": "recent"}]));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/search/recent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await["success"], true);

    let json = get_body_json(get(&app, "/api/search/recent").await).await;
    assert_eq!(json, json!([]));
}

// ========== Category API Tests ==========

#[tokio::test]
async fn test_list_categories_is_owner_scoped() {
    let app = setup_test_app();

    let json = get_body_json(get(&app, "/api/categories").await).await;
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 2);
    assert!(categories.iter().all(|c| c["owner"] == OWNER));
    assert!(categories.iter().all(|c| !c["fields"].as_array().unwrap().is_empty()));
}

#[tokio::test]
async fn test_list_templates() {
    let app = setup_test_app();

    let json = get_body_json(get(&app, "/api/categories/templates").await).await;
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert!(names.contains(&"Books".to_string()));
    assert!(names.contains(&"Movies".to_string()));
}

#[tokio::test]
async fn test_list_category_items() {
    let app = setup_test_app();
    let books = category_id(&app, "Books").await;

    let response = get(&app, &format!("/api/categories/{}/items", books)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get_body_json(response).await.as_array().unwrap().len(), 2);

    let response = get(&app, "/api/categories/99999/items").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Analytics API Tests ==========

#[tokio::test]
async fn test_get_analytics() {
    let app = setup_test_app();

    let response = get(&app, "/api/analytics?period=7d").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["overall_stats"]["total_categories"], 2);
    assert_eq!(json["overall_stats"]["total_items"], 3);
    assert_eq!(json["time_series"].as_array().unwrap().len(), 8);
    assert_eq!(json["rating_distribution"].as_array().unwrap().len(), 5);
    assert!(!json["insights"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_analytics_facets() {
    let app = setup_test_app();

    let json = get_body_json(get(&app, "/api/analytics/stats").await).await;
    assert_eq!(json["categories_with_items"], 2);

    // Default period is 30 days
    let json = get_body_json(get(&app, "/api/analytics/timeseries").await).await;
    let series = json.as_array().unwrap();
    assert_eq!(series.len(), 31);
    let total: i64 = series.iter().map(|p| p["count"].as_i64().unwrap()).sum();
    assert_eq!(total, 3);

    let json = get_body_json(get(&app, "/api/analytics/categories").await).await;
    let distribution = json.as_array().unwrap();
    assert_eq!(distribution[0]["category_name"], "Books");
    assert_eq!(distribution[0]["count"], 2);

    let json = get_body_json(get(&app, "/api/analytics/ratings").await).await;
    let counts: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["count"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, vec![0, 0, 1, 1, 1]);

    let json = get_body_json(get(&app, "/api/analytics/insights").await).await;
    assert_eq!(json[0]["title"], "Total Items Tracked");
    assert_eq!(json[0]["value"], 3);
}

#[tokio::test]
async fn test_analytics_invalid_period() {
    let app = setup_test_app();

    let response = get(&app, "/api/analytics?period=2w").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/analytics/timeseries?period=forever").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analytics_empty_owner() {
    let db = Database::in_memory().unwrap();
    let app = create_router(db, None, ServerConfig::default());

    let json = get_body_json(get(&app, "/api/analytics").await).await;
    assert_eq!(json["overall_stats"]["total_items"], 0);
    assert!(json["insights"].as_array().unwrap().is_empty());
    assert!(json["category_distribution"].as_array().unwrap().is_empty());
}

// ========== Middleware Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = get(&app, "/api/categories").await;
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
}

#[tokio::test]
async fn test_install_templates_once() {
    let db = Database::in_memory().unwrap();

    assert_eq!(install_templates(&db), 4);
    assert_eq!(install_templates(&db), 0);

    let app = create_router(db, None, ServerConfig::default());
    let json = get_body_json(get(&app, "/api/categories/templates").await).await;
    assert_eq!(json.as_array().unwrap().len(), 4);
}

#[test]
fn test_core_errors_map_to_status() {
    let err: AppError = shelf_core::Error::NotFound("category 7".into()).into();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err: AppError = shelf_core::Error::InvalidData("bad".into()).into();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);

    let err: AppError = shelf_core::Error::Gateway("down".into()).into();
    assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
