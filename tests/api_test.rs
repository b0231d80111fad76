//! API integration tests
//!
//! These tests exercise the HTTP layer with real in-process state (SQLite
//! database, TTL cache, mock LLM provider) via `tower::ServiceExt::oneshot`:
//! - Input validation (missing query key, unknown chart kind)
//! - The full NL-query path: translation, execution, response shape
//! - Translator memoization across requests
//! - KPI and chart endpoints over seeded data
//! - Prometheus metrics exposition

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use insightline::server::{create_api_router, ApiState};
use insightline::{AnalyticsEngine, Database, MockProvider, SqlCache, SqlGenerator};
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Build a test router wired to a fresh database and a mock provider.
/// Returns the router plus handles the tests assert against.
fn create_test_app(seed: bool, mock_sql: &str) -> (Router, Arc<Database>, Arc<MockProvider>, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = Arc::new(Database::new(dir.path().join("api.db")));
    db.init_schema().unwrap();
    if seed {
        insightline::seed::load_sample_data(&db).unwrap();
    }

    let provider = Arc::new(MockProvider::new(mock_sql));
    let cache = Arc::new(SqlCache::new(Duration::from_secs(60)));
    let generator = Arc::new(SqlGenerator::new(provider.clone(), cache));
    let analytics = Arc::new(AnalyticsEngine::new(db.clone()));

    let state = ApiState {
        db: db.clone(),
        analytics,
        generator,
        metrics_handle: insightline::metrics::init_metrics(),
    };
    (create_api_router(state), db, provider, dir)
}

/// Send a JSON POST request and return (status, parsed body).
async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

/// Send a GET request and return (status, raw body bytes).
async fn get_request(app: Router, uri: &str) -> (StatusCode, bytes::Bytes) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

// ── Tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_missing_key_is_bad_request() {
    let (app, _db, provider, _dir) = create_test_app(false, "SELECT 1");

    let (status, body) = post_json(app, "/api/query", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("error").is_some());
    // The provider is never consulted for invalid input.
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_query_empty_string_is_bad_request() {
    let (app, _db, _provider, _dir) = create_test_app(false, "SELECT 1");

    let (status, body) = post_json(app, "/api/query", r#"{"query": "  "}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No query provided");
}

#[tokio::test]
async fn test_query_happy_path() {
    let (app, _db, _provider, _dir) =
        create_test_app(true, "SELECT COUNT(*) as customer_count FROM customers");

    let (status, body) = post_json(
        app,
        "/api/query",
        r#"{"query": "How many customers do we have?"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["sql_query"],
        "SELECT COUNT(*) as customer_count FROM customers"
    );
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["customer_count"], 10);
}

#[tokio::test]
async fn test_query_repeated_question_hits_cache() {
    let (app, _db, provider, _dir) =
        create_test_app(true, "SELECT COUNT(*) as n FROM orders");

    let body = r#"{"query": "order volume?"}"#;
    let (status_a, first) = post_json(app.clone(), "/api/query", body).await;
    let (status_b, second) = post_json(app, "/api/query", body).await;

    assert_eq!(status_a, StatusCode::OK);
    assert_eq!(status_b, StatusCode::OK);
    assert_eq!(first["sql_query"], second["sql_query"]);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_query_bad_generated_sql_is_server_error() {
    let (app, _db, _provider, _dir) =
        create_test_app(false, "SELECT * FROM table_that_does_not_exist");

    let (status, body) = post_json(app, "/api/query", r#"{"query": "anything"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("SQL error"));
}

#[tokio::test]
async fn test_query_strips_code_fences_from_model_output() {
    let (app, _db, _provider, _dir) =
        create_test_app(false, "```sql\nSELECT 1 as x\n```");

    let (status, body) = post_json(app, "/api/query", r#"{"query": "one"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sql_query"], "SELECT 1 as x");
    assert_eq!(body["results"][0]["x"], 1);
}

#[tokio::test]
async fn test_kpis_over_seeded_data() {
    let (app, db, _provider, _dir) = create_test_app(true, "SELECT 1");

    let expected_orders = db
        .execute_query("SELECT COUNT(*) as n FROM orders")
        .unwrap()
        .to_objects()[0]["n"]
        .clone();

    let (status, body) = get_request(app, "/api/kpis").await;
    assert_eq!(status, StatusCode::OK);

    let kpis: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(kpis["total_customers"], 10);
    assert_eq!(kpis["total_orders"], expected_orders);
    assert!(kpis["total_revenue"].as_f64().unwrap() > 0.0);
    assert!(kpis["revenue_growth"].is_number());
}

#[tokio::test]
async fn test_kpis_on_empty_database() {
    let (app, _db, _provider, _dir) = create_test_app(false, "SELECT 1");

    let (status, body) = get_request(app, "/api/kpis").await;
    assert_eq!(status, StatusCode::OK);

    let kpis: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(kpis["total_revenue"], 0.0);
    assert_eq!(kpis["total_orders"], 0);
    assert_eq!(kpis["revenue_growth"], 0.0);
}

#[tokio::test]
async fn test_chart_unknown_kind_is_bad_request() {
    let (app, _db, _provider, _dir) = create_test_app(false, "SELECT 1");

    let (status, body) = get_request(app, "/api/chart/unknown_kind").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(value["error"].as_str().unwrap().contains("unknown_kind"));
}

#[tokio::test]
async fn test_chart_sales_trend_returns_array() {
    let (app, _db, _provider, _dir) = create_test_app(true, "SELECT 1");

    let (status, body) = get_request(app, "/api/chart/sales_trend").await;
    assert_eq!(status, StatusCode::OK);

    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let rows = value.as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows[0].get("month").is_some());
    assert!(rows[0].get("revenue").is_some());
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _db, _provider, _dir) = create_test_app(false, "SELECT 1");

    let (status, body) = get_request(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_exposition() {
    let (app, _db, _provider, _dir) = create_test_app(true, "SELECT 1");

    // Touch the executor so the query counter exists before rendering.
    let (status, _) = get_request(app.clone(), "/api/kpis").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_request(app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("insightline_sql_queries_total"));
}
