mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use aurum_api::domain::{NewsCategory, NewsPriority};
use common::{at, response_json, TestApp};

#[tokio::test]
async fn published_news_appears_in_the_open_feed_newest_first() {
    let app = TestApp::new().await;

    for title in ["Spring collection", "Atelier closed May 1st"] {
        let response = app
            .request_admin(
                Method::POST,
                "/api/v1/news",
                Some(json!({
                    "title": title,
                    "body": "Details inside.",
                    "category": "announcement",
                    "priority": "medium",
                })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.request(Method::GET, "/api/v1/news", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    let feed = body["data"].as_array().expect("feed array");
    assert_eq!(feed.len(), 2);
    assert_eq!(feed[0]["title"], "Atelier closed May 1st");
    assert_eq!(feed[1]["title"], "Spring collection");
}

#[tokio::test]
async fn targeted_expired_and_scheduled_items_stay_out_of_the_feed() {
    let app = TestApp::new().await;

    // Visible item.
    let response = app
        .request_admin(
            Method::POST,
            "/api/v1/news",
            Some(json!({
                "title": "Visible",
                "body": "...",
                "category": "sale",
                "priority": "high",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Targeted at a single customer, hidden from the open feed.
    let response = app
        .request_admin(
            Method::POST,
            "/api/v1/news",
            Some(json!({
                "title": "Your order shipped",
                "body": "...",
                "category": "personal",
                "priority": "high",
                "is_public": false,
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Already expired.
    let response = app
        .request_admin(
            Method::POST,
            "/api/v1/news",
            Some(json!({
                "title": "Old promo",
                "body": "...",
                "category": "promotion",
                "priority": "low",
                "expires_at": "2020-01-01T00:00:00Z",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Scheduled for the future.
    app.seed_news(
        NewsCategory::Event,
        NewsPriority::Medium,
        at(2099, 1, 1, 9),
    )
    .await;

    let response = app.request(Method::GET, "/api/v1/news", None, None).await;
    let body = response_json(response).await;
    let feed = body["data"].as_array().expect("feed array");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["title"], "Visible");
}

#[tokio::test]
async fn unknown_category_or_priority_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .request_admin(
            Method::POST,
            "/api/v1/news",
            Some(json!({
                "title": "Bad category",
                "body": "...",
                "category": "gossip",
                "priority": "high",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .request_admin(
            Method::POST,
            "/api/v1/news",
            Some(json!({
                "title": "Bad priority",
                "body": "...",
                "category": "update",
                "priority": "urgent",
            })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn engagement_counters_accumulate() {
    let app = TestApp::new().await;

    let response = app
        .request_admin(
            Method::POST,
            "/api/v1/news",
            Some(json!({
                "title": "Counted",
                "body": "...",
                "category": "announcement",
                "priority": "medium",
            })),
        )
        .await;
    let body = response_json(response).await;
    let news_id = body["data"]["id"].as_str().expect("news id").to_string();

    for _ in 0..2 {
        let response = app
            .request(
                Method::POST,
                &format!("/api/v1/news/{news_id}/click"),
                None,
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/news/{news_id}/read"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["click_count"], 2);
    assert_eq!(body["data"]["read_count"], 1);
}

#[tokio::test]
async fn engagement_on_a_missing_item_returns_not_found() {
    let app = TestApp::new().await;
    let missing = uuid::Uuid::new_v4();

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/news/{missing}/click"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/news/{missing}/read"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
