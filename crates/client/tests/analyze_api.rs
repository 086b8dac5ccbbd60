//! End-to-end tests for `DetectionClient::analyze` against an
//! in-process HTTP server.
//!
//! Each test spins up a small axum app on an ephemeral port that plays
//! one backend behavior: a streaming NDJSON analysis, a plain-JSON
//! verdict, an error status, or a health check.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::http::{header, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use veridect_client::client::{Analyzer, DetectionClient, VideoUpload};
use veridect_client::config::ClientConfig;
use veridect_client::schedule::Schedule;
use veridect_core::error::AnalyzeError;
use veridect_core::progress::{ProgressObserver, Stage};
use veridect_core::types::Prediction;

/// Serve `app` on an ephemeral port and return the base URL.
async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test backend");
    });
    format!("http://{addr}")
}

fn recording_observer() -> (ProgressObserver, Arc<Mutex<Vec<(Stage, f64)>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let observer: ProgressObserver = Box::new(move |stage, percent| {
        sink.lock().unwrap().push((stage, percent));
    });
    (observer, log)
}

fn sample_video() -> VideoUpload {
    VideoUpload::new("clip.mp4", vec![0u8; 64 * 1024])
}

const STREAMED_BODY: &str = concat!(
    r#"{"type":"progress","stage":"uploading","progress":100}"#,
    "\n",
    r#"{"type":"progress","stage":"extracting","progress":50}"#,
    "\n",
    r#"{"type":"progress","stage":"analyzing","progress":50}"#,
    "\n",
    r#"{"type":"result","result":{"prediction":"Real","confidence":92,"explanation":"Consistent lighting throughout.","frameAnalysis":{"totalFrames":10,"suspiciousFrames":0,"artifacts":[]}}}"#,
    "\n",
);

// ---------------------------------------------------------------------------
// Test: streaming backend drives the observer and resolves the verdict
// ---------------------------------------------------------------------------

#[tokio::test]
async fn streaming_backend_resolves_verdict() {
    let app = Router::new().route(
        "/analyze",
        post(|| async {
            (
                [(header::CONTENT_TYPE, "application/x-ndjson")],
                STREAMED_BODY,
            )
        }),
    );
    let base_url = spawn_backend(app).await;

    let client = DetectionClient::new(ClientConfig::with_base_url(base_url));
    let (observer, log) = recording_observer();
    let result = client.analyze(sample_video(), Some(observer)).await.unwrap();

    assert_eq!(result.prediction, Prediction::Real);
    assert_eq!(result.confidence, 92);

    let events = log.lock().unwrap();
    // The client emits (uploading, 0) before any I/O, then forwards the
    // streamed events, then closes with (complete, 100).
    assert_eq!(events[0], (Stage::Uploading, 0.0));
    assert_eq!(*events.last().unwrap(), (Stage::Complete, 100.0));
    let mut last = (0u8, 0.0f64);
    for &(stage, percent) in events.iter() {
        let key = (stage.ordinal(), percent);
        assert!(key >= last, "narrative regressed: {last:?} -> {key:?}");
        last = key;
    }
}

// ---------------------------------------------------------------------------
// Test: non-2xx status maps to a transport error with the status code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_status_is_transport_error() {
    let app = Router::new().route(
        "/analyze",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = spawn_backend(app).await;

    let client = DetectionClient::new(ClientConfig::with_base_url(base_url));
    let err = client.analyze(sample_video(), None).await.unwrap_err();
    assert_matches!(err, AnalyzeError::Transport { status: Some(500), .. });
}

// ---------------------------------------------------------------------------
// Test: plain-JSON backend falls back to the simulated schedule
// ---------------------------------------------------------------------------

#[tokio::test]
async fn plain_json_backend_uses_simulated_schedule() {
    let app = Router::new().route(
        "/analyze",
        post(|| async {
            Json(serde_json::json!({
                "prediction": "AI-generated",
                "confidence": 87,
                "explanation": "Warped edges around the face.",
                "frameAnalysis": {
                    "totalFrames": 10,
                    "suspiciousFrames": 7,
                    "artifacts": ["Warped facial edges"]
                }
            }))
        }),
    );
    let base_url = spawn_backend(app).await;

    let client = DetectionClient::new(ClientConfig::with_base_url(base_url))
        .with_schedule(Schedule::uniform(Duration::from_millis(2)));
    let (observer, log) = recording_observer();
    let result = client.analyze(sample_video(), Some(observer)).await.unwrap();

    assert_eq!(result.prediction, Prediction::AiGenerated);

    let events = log.lock().unwrap();
    // Every stage of the simulated narrative shows up despite the
    // backend offering no telemetry at all.
    for stage in [Stage::Uploading, Stage::Extracting, Stage::Analyzing] {
        assert!(
            events.iter().any(|&(s, _)| s == stage),
            "missing stage {stage}"
        );
    }
    assert_eq!(*events.last().unwrap(), (Stage::Complete, 100.0));
}

// ---------------------------------------------------------------------------
// Test: streaming response without a result event rejects with Protocol
// ---------------------------------------------------------------------------

#[tokio::test]
async fn streaming_without_result_is_protocol_error() {
    let app = Router::new().route(
        "/analyze",
        post(|| async {
            (
                [(header::CONTENT_TYPE, "application/x-ndjson")],
                "{\"type\":\"progress\",\"stage\":\"analyzing\",\"progress\":99}\n",
            )
        }),
    );
    let base_url = spawn_backend(app).await;

    let client = DetectionClient::new(ClientConfig::with_base_url(base_url));
    let err = client.analyze(sample_video(), None).await.unwrap_err();
    assert_matches!(err, AnalyzeError::Protocol(msg) if msg == "No result received");
}

// ---------------------------------------------------------------------------
// Test: an invalid streamed verdict is rejected, not surfaced
// ---------------------------------------------------------------------------

#[tokio::test]
async fn invalid_verdict_shape_is_protocol_error() {
    // suspiciousFrames exceeds totalFrames.
    let body = concat!(
        r#"{"type":"result","result":{"prediction":"Real","confidence":92,"explanation":"ok","frameAnalysis":{"totalFrames":3,"suspiciousFrames":9,"artifacts":[]}}}"#,
        "\n",
    );
    let app = Router::new().route(
        "/analyze",
        post(move || async move { ([(header::CONTENT_TYPE, "application/x-ndjson")], body) }),
    );
    let base_url = spawn_backend(app).await;

    let client = DetectionClient::new(ClientConfig::with_base_url(base_url));
    let (observer, log) = recording_observer();
    let err = client.analyze(sample_video(), Some(observer)).await.unwrap_err();

    assert_matches!(err, AnalyzeError::Protocol(_));
    // A failed run never reaches (complete, 100).
    assert!(!log
        .lock()
        .unwrap()
        .iter()
        .any(|&(stage, _)| stage == Stage::Complete));
}

// ---------------------------------------------------------------------------
// Test: unreachable backend is a transport error without a status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Nothing listens on this port.
    let client = DetectionClient::new(ClientConfig::with_base_url("http://127.0.0.1:9"));
    let err = client.analyze(sample_video(), None).await.unwrap_err();
    assert_matches!(err, AnalyzeError::Transport { status: None, .. });
}

// ---------------------------------------------------------------------------
// Test: health endpoint round trip
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_round_trip() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            Json(serde_json::json!({
                "status": "healthy",
                "message": "Deepfake detection API is running"
            }))
        }),
    );
    let base_url = spawn_backend(app).await;

    let client = DetectionClient::new(ClientConfig::with_base_url(base_url));
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
}
