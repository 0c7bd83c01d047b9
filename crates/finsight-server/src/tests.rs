//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use finsight_core::db::Database;
use finsight_core::models::TransactionRecord;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    setup_test_app_with_db(Database::in_memory().unwrap())
}

fn setup_test_app_with_db(db: Database) -> Router {
    let config = ServerConfig {
        require_auth: false,
        allowed_origins: vec![],
        ..Default::default()
    };
    create_router(db, InsightsEngine::default(), config)
}

fn setup_auth_app() -> Router {
    let config = ServerConfig {
        require_auth: true,
        api_keys: vec!["secret-key".to_string()],
        ..Default::default()
    };
    create_router(Database::in_memory().unwrap(), InsightsEngine::default(), config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

fn sample_batch() -> serde_json::Value {
    serde_json::json!({
        "userId": "user-1",
        "transactions": [
            {"amount": 3000, "category": "other", "date": "2024-01-01", "type": "INCOME"},
            {"amount": 50, "category": "food", "date": "2024-01-02", "type": "EXPENSE"},
            {"amount": 100, "category": "transport", "date": "2024-01-11"}
        ]
    })
}

// ========== Health & Categories ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_categories() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/v1/insights/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let categories: Vec<&str> = json["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        vec![
            "food",
            "transport",
            "entertainment",
            "utilities",
            "healthcare",
            "shopping",
            "other"
        ]
    );
}

// ========== Analyze ==========

#[tokio::test]
async fn test_analyze_batch() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/v1/insights/analyze", &sample_batch()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["userId"], "user-1");
    assert_eq!(json["totalSpending"], 150.0);
    assert_eq!(json["incomeVsExpense"]["totalIncome"], 3000.0);
    assert_eq!(json["incomeVsExpense"]["status"], "healthy");
    assert_eq!(json["spendingPatterns"][0]["category"], "transport");
    // 2024-01-01 .. 2024-01-11 is a ten day span
    assert_eq!(json["averageDailySpending"], 15.0);
    assert_eq!(json["projectedMonthlySpending"], 450.0);
}

#[tokio::test]
async fn test_analyze_empty_batch() {
    let app = setup_test_app();

    let body = serde_json::json!({"userId": "nobody", "transactions": []});
    let response = app
        .oneshot(post_json("/api/v1/insights/analyze", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalSpending"], 0.0);
    assert_eq!(
        json["savingsOpportunities"],
        serde_json::json!(["Start tracking your expenses to get personalized insights!"])
    );
}

#[tokio::test]
async fn test_analyze_invalid_record_is_bad_request() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "userId": "user-1",
        "transactions": [{"amount": -5, "category": "food", "date": "2024-01-01"}]
    });
    let response = app
        .oneshot(post_json("/api/v1/insights/analyze", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_quick_analyze() {
    let app = setup_test_app();

    let body = serde_json::json!([
        {"amount": 20, "category": "food", "date": "2024-02-01", "userId": "quick"},
        {"amount": 40, "category": "Entertainment", "date": "2024-02-03", "userId": "other"}
    ]);
    let response = app
        .oneshot(post_json("/api/v1/insights/quick-analyze", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["userId"], "quick");
    assert_eq!(json["totalSpending"], 60.0);
    assert_eq!(json["spendingPatterns"][0]["category"], "entertainment");
}

#[tokio::test]
async fn test_quick_analyze_empty_is_bad_request() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json("/api/v1/insights/quick-analyze", &serde_json::json!([])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Stored transactions ==========

#[tokio::test]
async fn test_store_then_user_insights() {
    let db = Database::in_memory().unwrap();
    let app = setup_test_app_with_db(db.clone());

    let response = app
        .clone()
        .oneshot(post_json("/api/v1/transactions", &sample_batch()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["inserted"], 3);
    assert_eq!(json["duplicates"], 0);

    // Same batch again is all duplicates
    let response = app
        .clone()
        .oneshot(post_json("/api/v1/transactions", &sample_batch()))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["inserted"], 0);
    assert_eq!(json["duplicates"], 3);

    let response = app.oneshot(get("/api/v1/insights/user/user-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["userId"], "user-1");
    assert_eq!(json["totalSpending"], 150.0);
    assert_eq!(db.count_transactions("user-1").unwrap(), 3);
}

#[tokio::test]
async fn test_user_insights_skips_invalid_rows() {
    let db = Database::in_memory().unwrap();
    db.insert_transaction(&TransactionRecord::expense(25.0, "food", "2024-01-01").with_user("u"))
        .unwrap();
    db.insert_transaction(&TransactionRecord::expense(10.0, "food", "someday").with_user("u"))
        .unwrap();

    let app = setup_test_app_with_db(db);
    let response = app.oneshot(get("/api/v1/insights/user/u")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["totalSpending"], 25.0);
}

#[tokio::test]
async fn test_user_insights_unknown_user() {
    let app = setup_test_app();

    let response = app.oneshot(get("/api/v1/insights/user/nobody")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["userId"], "nobody");
    assert_eq!(json["spendingPatterns"], serde_json::json!([]));
}

#[tokio::test]
async fn test_store_rejects_invalid_batch() {
    let db = Database::in_memory().unwrap();
    let app = setup_test_app_with_db(db.clone());

    let body = serde_json::json!({
        "userId": "u",
        "transactions": [
            {"amount": 10, "category": "food", "date": "2024-01-01"},
            {"amount": 10, "category": "  ", "date": "2024-01-02"}
        ]
    });
    let response = app
        .oneshot(post_json("/api/v1/transactions", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(db.count_transactions("u").unwrap(), 0);
}

// ========== Auth ==========

#[tokio::test]
async fn test_auth_required() {
    let app = setup_auth_app();

    let response = app
        .oneshot(get("/api/v1/insights/categories"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_wrong_key() {
    let app = setup_auth_app();

    let request = Request::builder()
        .uri("/api/v1/insights/categories")
        .header("authorization", "Bearer not-the-key")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_valid_key() {
    let app = setup_auth_app();

    let request = Request::builder()
        .uri("/api/v1/insights/categories")
        .header("authorization", "Bearer secret-key")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_public() {
    let app = setup_auth_app();

    let response = app.oneshot(get("/api/v1/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_user_named_health_requires_auth() {
    let db = Database::in_memory().unwrap();
    db.insert_transaction(&TransactionRecord::expense(250.0, "food", "2024-01-01").with_user("health"))
        .unwrap();
    let config = ServerConfig {
        require_auth: true,
        api_keys: vec!["secret-key".to_string()],
        ..Default::default()
    };
    let app = create_router(db, InsightsEngine::default(), config);

    let response = app
        .clone()
        .oneshot(get("/api/v1/insights/user/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/api/v1/insights/user/health")
        .header("authorization", "Bearer secret-key")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["totalSpending"], 250.0);
}

#[test]
fn test_public_paths() {
    assert!(is_public_path("/api/v1/health"));
    assert!(!is_public_path("/api/v1/insights/user/health"));
    assert!(!is_public_path("/api/v1/health/extra"));
}

#[test]
fn test_parse_list() {
    assert_eq!(
        parse_list(" a, b ,,c "),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
    assert!(parse_list("").is_empty());
}

#[test]
fn test_validate_api_key() {
    let keys = vec!["abc123".to_string(), "zzz".to_string()];
    assert!(validate_api_key("abc123", &keys));
    assert!(validate_api_key("zzz", &keys));
    assert!(!validate_api_key("abc124", &keys));
    assert!(!validate_api_key("abc", &keys));
    assert!(!validate_api_key("anything", &[]));
}
