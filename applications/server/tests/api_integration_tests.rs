/// API integration tests
/// Tests complete HTTP request/response cycles against a temporary library
mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use common::{create_test_app, drain, song, songs, write_catalogue};
use lockstep_server::ServerEvent;
use serde_json::Value;
use tower::util::ServiceExt;

async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, axum::body::Bytes) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body)
}

async fn send_json(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(router, method, uri).await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// Test health endpoint reports status, version and the session size
#[tokio::test]
async fn test_health() {
    let app = create_test_app(songs(1..=2)).await;
    let (_id, _rx) = app.hub.connect().await;

    let (status, body) = send_json(&app.router, "GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
    assert_eq!(body["clients"], 1);
    assert_eq!(body["songs"], 2);
}

/// Test library endpoint lists the shared queue in order
#[tokio::test]
async fn test_get_library() {
    let app = create_test_app(songs(1..=2)).await;

    let (status, body) = send_json(&app.router, "GET", "/api/library").await;

    assert_eq!(status, StatusCode::OK);
    let queue = body.as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert_eq!(queue[0]["url"], "u1");
    assert_eq!(queue[1]["path"], "library/song2.mp3");
}

/// Test refresh merges new catalogue entries without duplicating queued ones
#[tokio::test]
async fn test_refresh_library_merges_catalogue() {
    let app = create_test_app(vec![song(1), song(2)]).await;
    write_catalogue(
        &app.dir.path().join("libdata.json"),
        &[song(1), song(3)],
    );

    let (status, body) = send_json(&app.router, "POST", "/api/library/refresh").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["added"], 1);
    let urls: Vec<_> = body["queue"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["url"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(urls, ["u1", "u2", "u3"]);

    // Refreshing again finds nothing new
    let (_, body) = send_json(&app.router, "POST", "/api/library/refresh").await;
    assert_eq!(body["added"], 0);
}

/// Test refresh with a corrupt catalogue is a server error and leaves the queue alone
#[tokio::test]
async fn test_refresh_with_corrupt_catalogue() {
    let app = create_test_app(vec![song(1)]).await;
    std::fs::write(app.dir.path().join("libdata.json"), "not json").unwrap();

    let (status, body) = send_json(&app.router, "POST", "/api/library/refresh").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert_eq!(app.hub.snapshot().await.queue_len(), 1);
}

/// Test clear empties the queue, the catalogue and the audio directory
#[tokio::test]
async fn test_clear_library() {
    let app = create_test_app(songs(1..=2)).await;
    let (_id, mut rx) = app.hub.connect().await;
    drain(&mut rx);
    std::fs::write(app.dir.path().join("library/song1.mp3"), b"audio").unwrap();

    let (status, body) = send_json(&app.router, "POST", "/api/library/clear").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(app.hub.snapshot().await.queue_len(), 0);
    assert!(!app.dir.path().join("library/song1.mp3").exists());

    let received = drain(&mut rx);
    assert_eq!(received.len(), 1);
    assert!(matches!(
        &received[0].event,
        ServerEvent::Sync(state) if !state.is_playing
    ));

    let (_, queue) = send_json(&app.router, "GET", "/api/library").await;
    assert_eq!(queue, Value::Array(vec![]));
}

/// Test music endpoint streams the file as an attachment
#[tokio::test]
async fn test_music_serves_audio_file() {
    let app = create_test_app(vec![song(1)]).await;
    std::fs::write(app.dir.path().join("library/song1.mp3"), b"ID3 fake audio").unwrap();
    let encoded = URL_SAFE.encode("library/song1.mp3");

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/music/{}", encoded))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/mpeg");
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "14");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"song1.mp3\""
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ID3 fake audio");
}

/// Test music endpoint refuses paths outside the audio directory
#[tokio::test]
async fn test_music_rejects_traversal() {
    let app = create_test_app(vec![]).await;
    std::fs::write(app.dir.path().join("libdata.json"), "[]").unwrap();
    let encoded = URL_SAFE.encode("../libdata.json");

    let (status, body) = send(&app.router, "GET", &format!("/music/{}", encoded)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert!(body["error"].is_string());
}

/// Test music endpoint treats undecodable and missing paths as not found
#[tokio::test]
async fn test_music_missing_or_garbage() {
    let app = create_test_app(vec![]).await;

    let (status, _) = send(&app.router, "GET", "/music/%2A%2A%2A").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let encoded = URL_SAFE.encode("library/nothing.mp3");
    let (status, _) = send(&app.router, "GET", &format!("/music/{}", encoded)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test unknown routes are not found
#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app(vec![]).await;

    let (status, _) = send(&app.router, "GET", "/api/tracks").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Test plain GET on the websocket route without upgrade headers is rejected
#[tokio::test]
async fn test_ws_requires_upgrade() {
    let app = create_test_app(vec![]).await;

    let (status, _) = send(&app.router, "GET", "/ws").await;

    assert!(status.is_client_error());
}
