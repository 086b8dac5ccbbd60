//! Transport handler for the analysis protocol.
//!
//! [`DetectionClient`] uploads a video to the backend's `/analyze`
//! endpoint and reconciles the response into a single verdict. A
//! response that announces a newline-delimited event stream drives the
//! observer from real backend telemetry; any other response is treated
//! as a single JSON verdict and the simulated schedule keeps the
//! narrative moving while it is fetched. Either way the call resolves
//! with exactly one validated [`AnalysisResult`] or fails with one
//! classified [`AnalyzeError`].

use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use veridect_core::error::AnalyzeError;
use veridect_core::progress::{ProgressObserver, Stage};
use veridect_core::types::AnalysisResult;

use crate::config::ClientConfig;
use crate::decode::LineDecoder;
use crate::events::{parse_event, StreamEvent};
use crate::reducer::ProgressReducer;
use crate::schedule::Schedule;

/// A video blob queued for analysis.
///
/// Type and size validation is the submitting layer's concern; the
/// client uploads whatever it is handed.
#[derive(Debug, Clone)]
pub struct VideoUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl VideoUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a video from disk.
    pub async fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "video".into());
        Ok(Self {
            file_name,
            bytes: bytes.into(),
        })
    }

    /// Size of the blob in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// The analysis contract shared by the real transport and the mock.
///
/// One call is one run: it resolves with a single validated
/// [`AnalysisResult`] or fails with a classified [`AnalyzeError`],
/// never both, never neither. The observer, when given, sees an
/// ordered stage/percent narrative whose last event on success is
/// `(complete, 100)`.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        video: VideoUpload,
        observer: Option<ProgressObserver>,
    ) -> Result<AnalysisResult, AnalyzeError>;
}

/// Backend liveness report from `GET /health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// HTTP client for a deepfake-detection backend.
///
/// Construct one per backend and share it; each `analyze` call owns its
/// run state, so concurrent runs do not interfere.
pub struct DetectionClient {
    http: reqwest::Client,
    config: ClientConfig,
    schedule: Schedule,
    cancel: CancellationToken,
}

impl DetectionClient {
    /// Create a client from configuration.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across clients).
    pub fn with_client(http: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            http,
            config,
            schedule: Schedule::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the simulated-mode schedule.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Attach a cancellation token checked at every suspension point.
    ///
    /// Cancelling fails in-flight runs with [`AnalyzeError::Cancelled`].
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Check backend liveness via `GET {base_url}/health`.
    pub async fn health(&self) -> Result<HealthStatus, AnalyzeError> {
        let response = self
            .http
            .get(format!("{}/health", self.config.base_url))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalyzeError::Transport {
                status: Some(status.as_u16()),
                message: format!("health check failed with status {status}"),
            });
        }
        response
            .json::<HealthStatus>()
            .await
            .map_err(|e| AnalyzeError::Protocol(format!("malformed health response: {e}")))
    }

    /// Streaming mode: fold newline-delimited events into the pending
    /// result, forwarding progress to the reducer as it arrives.
    ///
    /// Malformed lines are skipped. The pending result is replaced by
    /// every later `result` event, so the last one wins. Stream end
    /// with no result at all is a protocol error.
    async fn consume_stream<S, E>(
        &self,
        mut body: S,
        reducer: &ProgressReducer,
    ) -> Result<AnalysisResult, AnalyzeError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut decoder = LineDecoder::new();
        let mut result: Option<AnalysisResult> = None;

        loop {
            let chunk = tokio::select! {
                _ = self.cancel.cancelled() => return Err(AnalyzeError::Cancelled),
                chunk = body.next() => chunk,
            };
            let Some(chunk) = chunk else { break };
            let chunk = chunk.map_err(|e| AnalyzeError::Transport {
                status: None,
                message: format!("stream read failed: {e}"),
            })?;
            for line in decoder.push(&chunk) {
                apply_line(&line, reducer, &mut result);
            }
        }
        if let Some(line) = decoder.finish() {
            apply_line(&line, reducer, &mut result);
        }

        result.ok_or_else(|| AnalyzeError::Protocol("No result received".into()))
    }

    /// Simulated mode: play the cosmetic schedule while the verdict
    /// body is fetched; both must finish before the run resolves.
    async fn simulated(
        &self,
        response: reqwest::Response,
        reducer: &ProgressReducer,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let playback = self.schedule.play(reducer, &self.cancel);
        let fetch = response.json::<AnalysisResult>();
        let (finished, result) = tokio::join!(playback, fetch);

        if !finished {
            return Err(AnalyzeError::Cancelled);
        }
        result.map_err(|e| {
            if e.is_decode() {
                AnalyzeError::Protocol(format!("malformed analysis result: {e}"))
            } else {
                transport_error(e)
            }
        })
    }
}

#[async_trait]
impl Analyzer for DetectionClient {
    async fn analyze(
        &self,
        video: VideoUpload,
        observer: Option<ProgressObserver>,
    ) -> Result<AnalysisResult, AnalyzeError> {
        let run_id = uuid::Uuid::new_v4();
        let reducer = ProgressReducer::new(observer);

        tracing::info!(
            %run_id,
            file_name = %video.file_name,
            size_bytes = video.len(),
            "Starting analysis upload",
        );

        // The narrative starts before any network I/O.
        reducer.report(Stage::Uploading, 0.0);

        let part = reqwest::multipart::Part::bytes(video.bytes.to_vec())
            .file_name(video.file_name.clone());
        let form = reqwest::multipart::Form::new().part("video", part);
        let request = self
            .http
            .post(format!("{}/analyze", self.config.base_url))
            .multipart(form)
            .timeout(self.config.upload_timeout);

        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(AnalyzeError::Cancelled),
            result = request.send() => result.map_err(transport_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%run_id, status = status.as_u16(), "Backend rejected the upload");
            return Err(AnalyzeError::Transport {
                status: Some(status.as_u16()),
                message: format!("analysis request failed with status {status}"),
            });
        }

        let result = if is_streaming(&response) {
            tracing::debug!(%run_id, "Streaming response, consuming event lines");
            self.consume_stream(Box::pin(response.bytes_stream()), &reducer)
                .await?
        } else {
            tracing::debug!(%run_id, "Non-streaming response, playing simulated schedule");
            self.simulated(response, &reducer).await?
        };

        result.validate()?;
        reducer.complete();
        tracing::info!(
            %run_id,
            prediction = %result.prediction,
            confidence = result.confidence,
            "Analysis finished",
        );
        Ok(result)
    }
}

/// Whether the response announces an incremental event stream.
///
/// The reference backend marks streaming responses as NDJSON (some
/// deployments use SSE framing headers); a plain `application/json`
/// body means no incremental telemetry is coming.
fn is_streaming(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("ndjson") || ct.contains("event-stream"))
        .unwrap_or(false)
}

/// Map a low-level HTTP error onto the transport variant.
fn transport_error(err: reqwest::Error) -> AnalyzeError {
    AnalyzeError::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}

/// Parse one protocol line and apply it to the run state.
///
/// Malformed lines are logged and skipped; they never abort the stream.
fn apply_line(line: &str, reducer: &ProgressReducer, result: &mut Option<AnalysisResult>) {
    if line.trim().is_empty() {
        return;
    }
    match parse_event(line) {
        Ok(StreamEvent::Progress { stage, progress }) => {
            reducer.report(stage, progress);
        }
        Ok(StreamEvent::Result { result: verdict }) => {
            *result = Some(verdict);
        }
        Err(e) => {
            tracing::warn!(error = %e, raw_line = %line, "Failed to parse stream event");
        }
    }
}
