mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{response_json, TestApp};

#[tokio::test]
async fn analytics_requires_the_admin_token() {
    let app = TestApp::new().await;

    let response = app
        .request(Method::GET, "/api/v1/analytics/dashboard", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::GET,
            "/api/v1/analytics/dashboard",
            None,
            Some("wrong-token"),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .request_admin(Method::GET, "/api/v1/analytics/dashboard", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn every_analytics_route_is_gated() {
    let app = TestApp::new().await;

    let routes = [
        "/api/v1/analytics/dashboard",
        "/api/v1/analytics/full",
        "/api/v1/analytics/kpi",
        "/api/v1/analytics/orders",
        "/api/v1/analytics/orders/daily-volume",
        "/api/v1/analytics/orders/monthly-volume",
        "/api/v1/analytics/customers",
        "/api/v1/analytics/communication",
        "/api/v1/analytics/news",
        "/api/v1/analytics/trends",
        "/api/v1/analytics/trends/monthly-growth",
        "/api/v1/analytics/alerts/timeline",
    ];
    for route in routes {
        let response = app.request(Method::GET, route, None, None).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{route} should be admin-only"
        );

        let response = app.request_admin(Method::GET, route, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{route} with token");
    }
}

#[tokio::test]
async fn order_lifecycle_routes_are_gated_but_intake_is_open() {
    let app = TestApp::new().await;

    // Public intake works without a token.
    let response = app
        .request(
            Method::POST,
            "/api/v1/customers",
            Some(json!({ "name": "Nur", "email": "nur@example.com" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let customer_id = body["data"]["id"].as_str().expect("customer id").to_string();

    let response = app
        .request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "customer_id": customer_id, "description": "Brooch" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    let order_id = body["data"]["id"].as_str().expect("order id").to_string();

    // Lifecycle mutations do not.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}/status"),
            Some(json!({ "status": "confirmed" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            &format!("/api/v1/orders/{order_id}/decision"),
            Some(json!({ "action": "accept" })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Reads on the same resource stay open.
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/orders/{order_id}"),
            None,
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn ticket_inbox_is_admin_only_but_submission_is_public() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/contacts",
            Some(json!({
                "name": "Guest",
                "email": "guest@example.com",
                "subject": "Sizing",
                "message": "Do you resize rings?",
            })),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.request(Method::GET, "/api/v1/contacts", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.request_admin(Method::GET, "/api/v1/contacts", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn news_publishing_is_admin_only_but_feed_is_public() {
    let app = TestApp::new().await;

    let payload = json!({
        "title": "Atelier closed next Monday",
        "body": "We are at the trade fair.",
        "category": "announcement",
        "priority": "medium",
    });

    let response = app
        .request(Method::POST, "/api/v1/news", Some(payload.clone()), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(Method::POST, "/api/v1/news", Some(payload), Some("nope"))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app.request(Method::GET, "/api/v1/news", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn guard_stays_open_when_no_token_is_configured() {
    let app = TestApp::with_config(|cfg| {
        cfg.admin_token = None;
    })
    .await;

    let response = app
        .request(Method::GET, "/api/v1/analytics/dashboard", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/api/v1/contacts", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn service_banner_and_health_are_open() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["checks"]["database"], "healthy");

    let response = app.request(Method::GET, "/api/v1/status", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["data"]["service"], "aurum-api");
    assert_eq!(body["data"]["environment"], "test");
}
