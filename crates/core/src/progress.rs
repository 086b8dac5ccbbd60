//! The fixed progress narrative reported during an analysis run.
//!
//! A run moves through the ordered stages `uploading`, `extracting`,
//! `analyzing`, `complete`. Within one run the reported stage never
//! moves backwards and `complete` is always the last thing an observer
//! sees.

use serde::{Deserialize, Serialize};

/// One phase of the analysis progress narrative.
///
/// The derived `Ord` follows declaration order, which is the narrative
/// order of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Uploading,
    Extracting,
    Analyzing,
    Complete,
}

impl Stage {
    /// Position of this stage in the fixed narrative (0-based).
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Wire name of the stage, as sent by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Extracting => "extracting",
            Self::Analyzing => "analyzing",
            Self::Complete => "complete",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ephemeral progress notification: one stage plus a 0-100 percent.
///
/// Events are delivered synchronously to the observer and then
/// discarded; they have no identity beyond the callback invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub percent: f64,
}

/// Callback invoked with `(stage, percent)` updates during a run.
pub type ProgressObserver = Box<dyn Fn(Stage, f64) + Send + Sync>;
