//! Integration tests for the `/webhooks` resource.

mod common;

use axum::http::StatusCode;
use common::{
    build_test_app, expect_json, get, post_json, test_capabilities, MockOracle, StubProvider,
};

#[tokio::test]
async fn register_webhook_returns_201() {
    let app = build_test_app(
        MockOracle::unreachable(),
        StubProvider::new("t"),
        test_capabilities(),
    );

    let json = expect_json(
        post_json(
            &app.router,
            "/api/v1/webhooks",
            serde_json::json!({ "url": "https://subscriber.example/hook" }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;

    assert!(json["id"].is_string());
    assert_eq!(json["url"], "https://subscriber.example/hook");
    assert!(json["createdAt"].is_string());
}

#[tokio::test]
async fn register_webhook_rejects_unparsable_url() {
    let app = build_test_app(
        MockOracle::unreachable(),
        StubProvider::new("t"),
        test_capabilities(),
    );

    let json = expect_json(
        post_json(
            &app.router,
            "/api/v1/webhooks",
            serde_json::json!({ "url": "not-a-url" }),
        )
        .await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn list_webhooks_returns_registrations_newest_first() {
    let app = build_test_app(
        MockOracle::unreachable(),
        StubProvider::new("t"),
        test_capabilities(),
    );

    post_json(
        &app.router,
        "/api/v1/webhooks",
        serde_json::json!({ "url": "https://a.example/hook" }),
    )
    .await;
    post_json(
        &app.router,
        "/api/v1/webhooks",
        serde_json::json!({ "url": "https://b.example/hook" }),
    )
    .await;

    let json = expect_json(get(&app.router, "/api/v1/webhooks").await, StatusCode::OK).await;
    let webhooks = json["webhooks"].as_array().unwrap();

    assert_eq!(webhooks.len(), 2);
    assert_eq!(webhooks[0]["url"], "https://b.example/hook");
    assert_eq!(webhooks[1]["url"], "https://a.example/hook");
}
