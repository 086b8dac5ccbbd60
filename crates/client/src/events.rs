//! Wire protocol events for the streaming analysis response.
//!
//! In streaming mode the backend writes one JSON object per line:
//! `{"type":"progress","stage":"analyzing","progress":50}` or
//! `{"type":"result","result":{...}}`. This module deserializes those
//! lines into a strongly-typed [`StreamEvent`].

use serde::Deserialize;
use veridect_core::progress::Stage;
use veridect_core::types::AnalysisResult;

/// One line of the streaming analysis protocol.
///
/// Deserialized via the internally-tagged `"type"` field; the remaining
/// fields sit at the top level of the same object.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Incremental progress report.
    Progress {
        stage: Stage,
        /// Percent within the stage, 0-100.
        progress: f64,
    },

    /// The terminal verdict. Does not end the stream by itself; when
    /// the backend sends several, the last one wins.
    Result { result: AnalysisResult },
}

/// Parse one complete line into a typed event.
///
/// Returns `Err` for malformed JSON or unknown `type` values. Callers
/// log malformed lines and continue; a bad line never aborts an
/// otherwise healthy stream.
pub fn parse_event(line: &str) -> Result<StreamEvent, serde_json::Error> {
    serde_json::from_str(line)
}
