#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use sea_orm::{ConnectOptions, Database};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use taglink::db::{self, store::SeaOrmStore};
use taglink::web::{self, validation::RequiredFieldValidator};

/// A store over a private in-memory SQLite database with the tables created.
pub async fn memory_store() -> SeaOrmStore {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // A single pooled connection keeps every query on the same in-memory database.
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opt)
        .await
        .unwrap_or_else(|err| panic!("failed to open sqlite: {err}"));
    db::create_tables(&conn)
        .await
        .unwrap_or_else(|err| panic!("failed to create tables: {err}"));
    SeaOrmStore::new(conn)
}

pub async fn test_app() -> Router {
    web::create_axum_router(
        Arc::new(memory_store().await),
        Arc::new(RequiredFieldValidator),
    )
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|err| panic!("response is not JSON ({err}): {}", self.body))
    }
}

async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .unwrap_or_else(|err| panic!("router request failed: {err}"));
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap_or_else(|err| panic!("failed to read response body: {err}"));
    TestResponse {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|err| panic!("response body is not UTF-8: {err}")),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap_or_else(|err| panic!("failed to build request: {err}"));
    send(app, request).await
}

pub async fn post_raw(app: &Router, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap_or_else(|err| panic!("failed to build request: {err}"));
    send(app, request).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    post_raw(app, uri, &body.to_string()).await
}

pub async fn create_user(app: &Router, name: &str, email: &str) {
    let response = post(app, "/users", serde_json::json!({ "name": name, "email": email })).await;
    assert_eq!(response.body, r#"{"message":"Success"}"#);
}

pub async fn create_tag_link(app: &Router, user_id: i64, tag_id: &str) -> Value {
    post(app, "/taglinks", serde_json::json!({ "user_id": user_id, "tag_id": tag_id }))
        .await
        .json()
}

pub async fn create_slot(app: &Router, name: &str, link: &str, tag_link_id: i64) -> Value {
    post(
        app,
        "/slots",
        serde_json::json!({ "name": name, "link": link, "tag_link_id": tag_link_id }),
    )
    .await
    .json()
}

pub fn id_of(value: &Value) -> i64 {
    value["id"]
        .as_i64()
        .unwrap_or_else(|| panic!("no integer id in {value}"))
}
