use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use std::io::Cursor;
use tower::ServiceExt;

use ifypixels::removal::{MatteEngine, RemovalService};
use ifypixels::storage::OutputStorage;
use ifypixels::web::{removal_router, RemovalState};

const BOUNDARY: &str = "ifypixels-test-boundary";

fn build_app(output_dir: &std::path::Path) -> Router {
    let storage = OutputStorage::new(output_dir.to_path_buf());
    let state = RemovalState {
        service: RemovalService::new(MatteEngine::default(), storage.clone()),
        storage,
    };
    removal_router(state)
}

fn multipart_upload(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn post_multipart(app: &Router, uri: &str, body: Vec<u8>) -> (StatusCode, String) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len().to_string())
        .body(Body::from(body))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, String::from_utf8_lossy(&bytes).to_string())
}

fn sample_png() -> Vec<u8> {
    let mut image = image::RgbaImage::from_pixel(32, 32, image::Rgba([255, 255, 255, 255]));
    for y in 10..22 {
        for x in 10..22 {
            image.put_pixel(x, y, image::Rgba([180, 30, 30, 255]));
        }
    }
    let mut encoded = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut encoded), image::ImageFormat::Png)
        .unwrap();
    encoded
}

#[tokio::test]
async fn upload_form_is_served() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("<form"));
    assert!(html.contains("multipart/form-data"));
}

#[tokio::test]
async fn unsupported_extension_is_rejected_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("out");
    let app = build_app(&output_dir);

    let body = multipart_upload("image", "notes.txt", "text/plain", b"hello");
    let (status, text) = post_multipart(&app, "/", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        text,
        "Unsupported file format. Please upload PNG, JPG, or JPEG image."
    );
    assert!(!output_dir.exists());
}

#[tokio::test]
async fn missing_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path());

    let body = multipart_upload("other", "photo.png", "image/png", b"irrelevant");
    let (status, text) = post_multipart(&app, "/", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "No file selected!");

    // A file input left empty submits an empty filename.
    let body = multipart_upload("image", "", "application/octet-stream", b"");
    let (status, text) = post_multipart(&app, "/", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(text, "No file selected!");
}

#[tokio::test]
async fn upload_stores_a_new_decodable_cutout() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("out");
    let app = build_app(&output_dir);

    let body = multipart_upload("image", "photo.png", "image/png", &sample_png());
    let (status, text) = post_multipart(&app, "/", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("uploads/remove/"));

    let entries: Vec<_> = std::fs::read_dir(&output_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);

    let stored = std::fs::read(&entries[0]).unwrap();
    let decoded = image::load_from_memory(&stored).unwrap().to_rgba8();
    assert_eq!(decoded.get_pixel(0, 0)[3], 0);
    assert_eq!(decoded.get_pixel(16, 16)[3], 255);
}

#[tokio::test]
async fn stored_output_is_downloadable() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("out");
    let app = build_app(&output_dir);

    let body = multipart_upload("image", "photo.png", "image/png", &sample_png());
    let (status, _) = post_multipart(&app, "/", body).await;
    assert_eq!(status, StatusCode::OK);

    let file_name = std::fs::read_dir(&output_dir)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .file_name()
        .into_string()
        .unwrap();

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/uploads/remove/{file_name}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(image::load_from_memory(&bytes).is_ok());
}

#[tokio::test]
async fn unknown_output_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path());

    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/uploads/remove/{}.png", uuid::Uuid::new_v4()))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn traversal_in_download_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/uploads/remove/..%2Fconfig.toml")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let dir = tempfile::tempdir().unwrap();
    let app = build_app(dir.path());

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
