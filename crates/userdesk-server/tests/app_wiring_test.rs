mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{build_test_context, build_test_context_with, request_no_body};
use serde_json::json;
use tower::util::ServiceExt;
use userdesk_server::config::ServerConfig;

async fn get_with_origin(app: &axum::Router, uri: &str, origin: &str) -> axum::response::Response {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .header("Origin", origin)
        .body(Body::empty())
        .expect("request should build");
    app.clone()
        .oneshot(req)
        .await
        .expect("request should be handled")
}

#[tokio::test]
async fn health_returns_ok_true() {
    let ctx = build_test_context().await.expect("test context should build");
    let (status, body, trace) = request_no_body(&ctx.app, "GET", "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"ok": true}));
    let trace = trace.expect("trace id header should be set");
    assert_eq!(trace.len(), 16);
}

#[tokio::test]
async fn openapi_document_lists_user_routes() {
    let ctx = build_test_context().await.expect("test context should build");
    let (status, body, _) = request_no_body(&ctx.app, "GET", "/api/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    let paths = body["paths"].as_object().expect("paths should be an object");
    for path in ["/api/health", "/api/users", "/api/users/{id}"] {
        assert!(paths.contains_key(path), "missing {path}");
    }
    assert!(body["paths"]["/api/users"]["post"].is_object());
    assert!(body["paths"]["/api/users/{id}"]["delete"].is_object());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let ctx = build_test_context().await.expect("test context should build");
    let (status, _, _) = request_no_body(&ctx.app, "GET", "/api/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cors_allows_only_configured_origins() {
    let config = ServerConfig {
        cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        ..ServerConfig::default()
    };
    let ctx = build_test_context_with(config)
        .await
        .expect("test context should build");

    let resp = get_with_origin(&ctx.app, "/api/health", "http://localhost:3000").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );

    let resp = get_with_origin(&ctx.app, "/api/health", "http://evil.example").await;
    assert!(resp.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn empty_origin_list_allows_any_origin() {
    let config = ServerConfig {
        cors_allowed_origins: Vec::new(),
        ..ServerConfig::default()
    };
    let ctx = build_test_context_with(config)
        .await
        .expect("test context should build");

    let resp = get_with_origin(&ctx.app, "/api/health", "http://anywhere.example").await;
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
