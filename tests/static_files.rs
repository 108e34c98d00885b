//! Static file server tests, driven through the router in-process.

use std::fs;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use cors_relay::config::StaticFilesConfig;
use cors_relay::StaticServer;
use http_body_util::BodyExt;
use tower::ServiceExt;

fn site() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("index.html"), "<h1>clock</h1>").unwrap();
    fs::write(dir.path().join("app.JS"), "console.log(1)").unwrap();
    fs::write(dir.path().join("data.bin"), [0u8, 1, 2]).unwrap();
    fs::write(dir.path().join("mod.wasm"), [0u8, 97, 115, 109]).unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs").join("index.html"), "docs").unwrap();
    fs::create_dir(dir.path().join("empty")).unwrap();

    let mut config = StaticFilesConfig {
        root: dir.path().to_path_buf(),
        ..StaticFilesConfig::default()
    };
    config
        .mime_types
        .insert("wasm".to_string(), "application/wasm".to_string());

    let router = StaticServer::new(&config).router();
    (dir, router)
}

async fn send(router: &Router, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, headers, body)
}

#[tokio::test]
async fn root_serves_index_with_html_type() {
    let (_dir, router) = site();
    let (status, headers, body) = send(&router, Method::GET, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "text/html; charset=utf-8");
    assert_eq!(headers["content-length"], "14");
    assert_eq!(body, b"<h1>clock</h1>");
}

#[tokio::test]
async fn every_response_carries_static_headers() {
    let (_dir, router) = site();
    for uri in ["/index.html", "/missing.txt"] {
        let (_, headers, _) = send(&router, Method::GET, uri).await;
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
        assert_eq!(headers["cache-control"], "no-cache, no-store, must-revalidate");
        assert_eq!(headers["pragma"], "no-cache");
        assert_eq!(headers["expires"], "0");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
    }
}

#[tokio::test]
async fn content_types_follow_the_table() {
    let (_dir, router) = site();

    let (_, headers, _) = send(&router, Method::GET, "/app.JS").await;
    assert_eq!(headers["content-type"], "text/javascript; charset=utf-8");

    let (_, headers, _) = send(&router, Method::GET, "/data.bin").await;
    assert_eq!(headers["content-type"], "application/octet-stream");

    let (_, headers, _) = send(&router, Method::GET, "/mod.wasm").await;
    assert_eq!(headers["content-type"], "application/wasm");
}

#[tokio::test]
async fn head_returns_headers_only() {
    let (_dir, router) = site();
    let (status, headers, body) = send(&router, Method::HEAD, "/index.html").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-length"], "14");
    assert!(body.is_empty());
}

#[tokio::test]
async fn directories_redirect_then_serve_index() {
    let (_dir, router) = site();

    let (status, headers, _) = send(&router, Method::GET, "/docs?v=1").await;
    assert_eq!(status, StatusCode::MOVED_PERMANENTLY);
    assert_eq!(headers["location"], "/docs/?v=1");

    let (status, _, body) = send(&router, Method::GET, "/docs/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"docs");

    let (status, _, _) = send(&router, Method::GET, "/empty/").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn traversal_and_misses_are_not_found() {
    let (_dir, router) = site();
    for uri in ["/missing.txt", "/%2e%2e/etc/passwd", "/docs/..%2f..%2fetc"] {
        let (status, _, _) = send(&router, Method::GET, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[tokio::test]
async fn options_and_unsupported_methods() {
    let (_dir, router) = site();

    let (status, headers, body) = send(&router, Method::OPTIONS, "/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(body.is_empty());

    let (status, headers, _) = send(&router, Method::DELETE, "/index.html").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers["allow"], "GET, HEAD, OPTIONS");
}
