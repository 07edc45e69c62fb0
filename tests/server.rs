//! # HTTP Interface Tests
//!
//! Drives the router directly with `tower::ServiceExt::oneshot`.

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

use cupom::server::router;
use cupom::service::{PrintService, ServiceConfig};
use cupom::transport::RecordingBackend;

fn app(config: ServiceConfig) -> (axum::Router, RecordingBackend) {
    let backend = RecordingBackend::new();
    let service = PrintService::new(config, backend.clone()).with_opener(|_| Ok(()));
    (router(service), backend)
}

async fn post_json(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn tiny_png() -> Vec<u8> {
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(image::GrayImage::new(8, 8))
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    png.into_inner()
}

#[tokio::test]
async fn test_ping() {
    let (app, _) = app(ServiceConfig::default());
    let response = app
        .oneshot(Request::get("/api/ping").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"pong");
}

#[tokio::test]
async fn test_print_base64_success() {
    let (app, backend) = app(ServiceConfig::default());
    let payload = format!("data:image/png;base64,{}", STANDARD.encode(tiny_png()));

    let (status, body) = post_json(app, "/api/print-base64", json!({ "payload": payload })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["page_size"]["width_um"], 72_000);
    assert_eq!(backend.len(), 1);
}

#[tokio::test]
async fn test_print_base64_rejects_garbage() {
    let (app, backend) = app(ServiceConfig::default());

    let (status, body) = post_json(
        app,
        "/api/print-base64",
        json!({ "payload": "data:text/plain;base64,aGVsbG8=" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Invalid payload"));
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_print_base64_not_ready_is_gateway_timeout() {
    let config = ServiceConfig {
        ready_timeout: Duration::ZERO,
        ..ServiceConfig::default()
    };
    let (app, backend) = app(config);
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(image::GrayImage::new(2000, 3000))
        .write_to(&mut png, image::ImageFormat::Png)
        .unwrap();
    let payload = format!("data:image/png;base64,{}", STANDARD.encode(png.into_inner()));

    let (status, body) = post_json(app, "/api/print-base64", json!({ "payload": payload })).await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not ready"));
    assert!(backend.is_empty());
}

#[tokio::test]
async fn test_printer_info() {
    let (app, _) = app(ServiceConfig::default());
    let response = app
        .oneshot(Request::get("/api/printer").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["backend"], "dry-run");
    assert_eq!(body["width_dots"], 576);
    assert_eq!(body["options"]["silent"], true);
    assert_eq!(body["options"]["margins"], "none");
}

#[tokio::test]
async fn test_preview_receipt_custom_body() {
    let dir = tempfile::tempdir().unwrap();
    let config = ServiceConfig {
        preview_dir: dir.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    let (app, _) = app(config);

    let (status, body) = post_json(
        app,
        "/api/preview-receipt",
        json!({ "title": "TESTE", "items": [{ "description": "Agua", "unit_cents": 300 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let path = body["path"].as_str().unwrap();
    assert!(std::path::Path::new(path).exists());
}

#[tokio::test]
async fn test_preview_receipt_bad_json() {
    let (app, _) = app(ServiceConfig::default());
    let request = Request::post("/api/preview-receipt")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_preview_receipt_invalid_layout() {
    let (app, _) = app(ServiceConfig::default());

    let (status, body) = post_json(
        app.clone(),
        "/api/preview-receipt",
        json!({ "columns": 2_000_000_000u64, "items": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = post_json(
        app,
        "/api/preview-receipt",
        json!({ "items": [{
            "description": "Caixa",
            "quantity": 4_000_000_000u32,
            "unit_cents": 9_000_000_000_000_000_000i64
        }] }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
