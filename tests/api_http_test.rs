mod common;

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{token_for, TestApp};
use simlab_inventory_api::{app, auth::Role};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_database_up() {
    let test_app = TestApp::new().await;
    let router = app(test_app.state.clone());

    let response = router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn mutations_require_a_bearer_token() {
    let test_app = TestApp::new().await;
    let router = app(test_app.state.clone());

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/items")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"sku": "SKU-HTTP", "name": "Gloves"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_token_creates_and_lists_items() {
    let test_app = TestApp::new().await;
    let router = app(test_app.state.clone());
    let token = token_for(Role::Admin);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/items")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    json!({"sku": "SKU-HTTP", "name": "Gloves", "min_stock": 5}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["sku"], "SKU-HTTP");
    assert_eq!(created["min_stock"], 5);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/items")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_json(response).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["sku"], "SKU-HTTP");
}

#[tokio::test]
async fn staff_token_is_forbidden_from_catalog_changes() {
    let test_app = TestApp::new().await;
    let router = app(test_app.state.clone());
    let token = token_for(Role::Staff);

    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/items")
                .header(header::CONTENT_TYPE, "application/json")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::from(
                    json!({"sku": "SKU-HTTP", "name": "Gloves"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Forbidden");
}
