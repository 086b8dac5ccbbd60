//! Backend-free analyzer returning canned verdicts.
//!
//! Stands in for a real detection backend during development: plays the
//! full simulated schedule and then resolves with one of a small pool
//! of plausible verdicts. It implements [`Analyzer`], so the
//! composition root can swap it for a [`DetectionClient`] without
//! touching any caller.
//!
//! [`DetectionClient`]: crate::client::DetectionClient

use async_trait::async_trait;
use rand::Rng;
use tokio_util::sync::CancellationToken;
use veridect_core::error::AnalyzeError;
use veridect_core::progress::ProgressObserver;
use veridect_core::types::{AnalysisResult, FrameAnalysis, Prediction};

use crate::client::{Analyzer, VideoUpload};
use crate::reducer::ProgressReducer;
use crate::schedule::Schedule;

/// Analyzer that fabricates verdicts locally.
pub struct MockAnalyzer {
    schedule: Schedule,
    cancel: CancellationToken,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self {
            schedule: Schedule::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the playback schedule.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// Attach a cancellation token, mirroring the real client.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The canned verdict pool, one entry per prediction kind.
    fn canned_results() -> Vec<AnalysisResult> {
        vec![
            AnalysisResult {
                prediction: Prediction::AiGenerated,
                confidence: 87,
                explanation: "Multiple frames showed unnatural facial movements, \
                              inconsistent lighting patterns, and warped edges around \
                              the subject's face, indicating AI generation."
                    .into(),
                frame_analysis: Some(FrameAnalysis {
                    total_frames: 10,
                    suspicious_frames: 7,
                    artifacts: vec![
                        "Unnatural eye blinking patterns".into(),
                        "Inconsistent skin texture".into(),
                        "Warped facial edges".into(),
                        "Background inconsistencies".into(),
                    ],
                }),
            },
            AnalysisResult {
                prediction: Prediction::Real,
                confidence: 92,
                explanation: "Analysis shows consistent lighting, natural facial \
                              movements, and authentic skin texture throughout all \
                              frames with no detectable AI artifacts."
                    .into(),
                frame_analysis: Some(FrameAnalysis {
                    total_frames: 10,
                    suspicious_frames: 0,
                    artifacts: vec![],
                }),
            },
            AnalysisResult {
                prediction: Prediction::Uncertain,
                confidence: 64,
                explanation: "Video quality was insufficient for reliable detection. \
                              Some frames showed potential artifacts, but results are \
                              inconclusive."
                    .into(),
                frame_analysis: Some(FrameAnalysis {
                    total_frames: 8,
                    suspicious_frames: 2,
                    artifacts: vec!["Low video quality affecting analysis".into()],
                }),
            },
        ]
    }
}

impl Default for MockAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(
        &self,
        video: VideoUpload,
        observer: Option<ProgressObserver>,
    ) -> Result<AnalysisResult, AnalyzeError> {
        tracing::info!(
            file_name = %video.file_name,
            size_bytes = video.len(),
            "Mock analysis, no backend contacted",
        );

        let reducer = ProgressReducer::new(observer);
        if !self.schedule.play(&reducer, &self.cancel).await {
            return Err(AnalyzeError::Cancelled);
        }
        reducer.complete();

        let mut pool = Self::canned_results();
        let pick = rand::rng().random_range(0..pool.len());
        Ok(pool.swap_remove(pick))
    }
}
