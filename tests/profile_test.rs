mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

async fn get_profile(
    app: axum::Router,
    cookie: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/profile")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_first_access_creates_profile_with_defaults() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::create_session_cookie(&pool, &user).await;

    let (status, json) = get_profile(app, &cookie).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["unit"], "kg");
    assert_eq!(json["goal"], "hypertrophy");
    assert_eq!(json["default_duration"], 30);
    assert_eq!(json["rpe_input_mode"], "all_sets");
    assert_eq!(json["rpe_quick_chips"], serde_json::json!([3, 5, 7, 8, 9]));
}

#[tokio::test]
async fn test_repeat_access_does_not_recreate() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::create_session_cookie(&pool, &user).await;

    let (_, first) = get_profile(app.clone(), &cookie).await;
    let (_, second) = get_profile(app, &cookie).await;
    assert_eq!(first["created_at"], second["created_at"]);

    let conn = pool.get().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM profiles WHERE user_id = ?",
            [&user.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_partial_update() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::create_session_cookie(&pool, &user).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/profile")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"goal": "strength", "default_duration": 45}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (_, json) = get_profile(app, &cookie).await;
    assert_eq!(json["goal"], "strength");
    assert_eq!(json["default_duration"], 45);
    // Untouched fields keep their defaults
    assert_eq!(json["unit"], "kg");
    assert_eq!(json["rpe_quick_chips"], serde_json::json!([3, 5, 7, 8, 9]));
}

#[tokio::test]
async fn test_update_rejects_out_of_range_chips() {
    let pool = common::setup_test_db();
    let app = common::create_test_app(pool.clone());
    let user = common::create_test_user(&pool, "alice", "password123").await;
    let cookie = common::create_session_cookie(&pool, &user).await;

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/profile")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::json!({"rpe_quick_chips": [0, 5, 11]}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
