mod common;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use printshop_api::{
    build_app,
    middleware::auth::{ROLE_USER, issue_token},
};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn cart_requires_a_token() {
    let app = build_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/api/cart/get").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Access Denied. No token provided.");
}

#[tokio::test]
async fn shopper_token_cannot_delete_orders() {
    let token = issue_token(common::JWT_SECRET, Uuid::new_v4(), ROLE_USER).unwrap();
    let app = build_app(common::offline_state());
    let response = app
        .oneshot(
            Request::delete(format!("/api/orders/delete/{}", Uuid::new_v4()))
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn raw_auth_token_header_is_accepted() {
    let token = issue_token(common::JWT_SECRET, Uuid::new_v4(), ROLE_USER).unwrap();
    let app = build_app(common::offline_state());
    let response = app
        .oneshot(
            Request::get("/api/orders/all-orders")
                .header("auth-token", token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Authenticated, but not an admin.
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn tampered_token_is_unauthorized() {
    let token = issue_token("some-other-secret", Uuid::new_v4(), ROLE_USER).unwrap();
    let app = build_app(common::offline_state());
    let response = app
        .oneshot(
            Request::get("/api/orders/my-orders")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_path_falls_back_to_json_404() {
    let app = build_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/api/nowhere").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["data"]["path"], "/api/nowhere");
}

#[tokio::test]
async fn health_route_is_served_and_tagged_with_request_id() {
    let app = build_app(common::offline_state());
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn contact_form_rejects_missing_fields() {
    let app = build_app(common::offline_state());
    let response = app
        .oneshot(
            Request::post("/api/contact")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"name":"Asha","email":"","message":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
