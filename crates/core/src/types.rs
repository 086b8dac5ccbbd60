//! Terminal verdict types for one analysis run.
//!
//! The backend reports the verdict as JSON with camelCase keys; these
//! structs are the typed form of that wire contract. A result is
//! immutable once constructed: exactly one is produced per successful
//! run and callers only ever read it.

use serde::{Deserialize, Serialize};

use crate::error::AnalyzeError;

/// Classification assigned to the analyzed video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Prediction {
    /// The video shows detectable signs of AI generation.
    #[serde(rename = "AI-generated")]
    AiGenerated,
    /// No AI artifacts were detected.
    Real,
    /// The analysis could not reach a reliable verdict.
    Uncertain,
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AiGenerated => "AI-generated",
            Self::Real => "Real",
            Self::Uncertain => "Uncertain",
        };
        f.write_str(name)
    }
}

/// Per-frame breakdown attached to a verdict when the backend samples
/// individual frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalysis {
    /// Number of frames sampled from the video.
    pub total_frames: u32,
    /// How many sampled frames carried suspicious artifacts.
    pub suspicious_frames: u32,
    /// Human-readable artifact descriptions, in detection order.
    pub artifacts: Vec<String>,
}

/// The terminal output of one successful analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub prediction: Prediction,
    /// Confidence percent, 0-100 inclusive.
    pub confidence: u8,
    /// Free-text explanation of the verdict. Never empty.
    pub explanation: String,
    /// Optional per-frame breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_analysis: Option<FrameAnalysis>,
}

impl AnalysisResult {
    /// Check the data-model invariants on a deserialized verdict.
    ///
    /// A verdict violating these came from a misbehaving backend, so a
    /// failure here is a [`AnalyzeError::Protocol`] and the verdict is
    /// never surfaced to the caller.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        if self.confidence > 100 {
            return Err(AnalyzeError::Protocol(format!(
                "confidence {} out of range 0-100",
                self.confidence
            )));
        }
        if self.explanation.trim().is_empty() {
            return Err(AnalyzeError::Protocol("explanation is empty".into()));
        }
        if let Some(frames) = &self.frame_analysis {
            if frames.suspicious_frames > frames.total_frames {
                return Err(AnalyzeError::Protocol(format!(
                    "suspiciousFrames {} exceeds totalFrames {}",
                    frames.suspicious_frames, frames.total_frames
                )));
            }
            if frames.artifacts.iter().any(|a| a.trim().is_empty()) {
                return Err(AnalyzeError::Protocol(
                    "empty artifact description".into(),
                ));
            }
        }
        Ok(())
    }
}
