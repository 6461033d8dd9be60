// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Web client served from the static directory

use crate::common::{app, body_string, orchestrator, static_retriever, Decision, ScriptedModel};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn static_app() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("index.html"), "<html>docs assistant</html>").unwrap();
    fs::write(dir.path().join("script.js"), "console.log('ready');").unwrap();

    let model = Arc::new(ScriptedModel::new(Decision::Answer, &[]));
    let router = app(orchestrator(model, static_retriever(&[])), dir.path());
    (dir, router)
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_string(response).await)
}

#[tokio::test]
async fn test_root_serves_index_html() {
    let (_dir, router) = static_app();
    let (status, body) = get(router, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "<html>docs assistant</html>");
}

#[tokio::test]
async fn test_named_static_file() {
    let (_dir, router) = static_app();
    let (status, body) = get(router, "/script.js").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("ready"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let (_dir, router) = static_app();
    let (status, _) = get(router, "/missing.css").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
