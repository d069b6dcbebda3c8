//! Shared setup for router-level tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;

use pmcompanion_api::config::{Config, RuntimeMode};
use pmcompanion_api::repo::Repository;
use pmcompanion_api::{build_router, AppState};

pub const INDEX_HTML: &str = "<!doctype html><title>pm companion</title>";

/// Router over `repo`, serving a throwaway bundle with a single `index.html`.
pub fn router_with(repo: Arc<dyn Repository>, runtime_mode: RuntimeMode) -> (Router, TempDir) {
    let static_dir = TempDir::new().expect("tempdir");
    std::fs::write(static_dir.path().join("index.html"), INDEX_HTML).expect("write index");
    std::fs::write(static_dir.path().join("app.js"), "console.log('hi');").expect("write asset");

    let config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        runtime_mode,
        hosted: None,
        database_path: ":memory:".into(),
        static_dir: static_dir.path().to_path_buf(),
        cors_origins: Vec::new(),
    };
    let state = AppState {
        repo,
        config: Arc::new(config),
    };
    (build_router(state), static_dir)
}

pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    match body {
        Some(val) => builder.body(Body::from(val.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = body_bytes(resp).await;
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
}
