//! Error taxonomy for the analysis protocol.
//!
//! Every failure an analyzer can produce is classified into one of the
//! variants below before it reaches the caller. Raw transport or parse
//! errors never leak through the `analyze` contract; they arrive either
//! as a classified variant or wrapped inside [`AnalyzeError::Analysis`]
//! with the original cause preserved.

/// Classified failure of one analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// Network or HTTP failure before or during the upload.
    ///
    /// Carries the HTTP status code when the server responded at all.
    /// Never retried by the client; retry is the caller's decision.
    #[error("transport failure: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The stream ended without producing a result, or the result
    /// payload failed shape validation.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Catch-all for any other failure during processing.
    ///
    /// The display string is stable for UI use; the original failure
    /// message and cause are kept for diagnostics.
    #[error("failed to analyze video, please try again")]
    Analysis {
        /// Message of the original failure.
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The run was cancelled via its cancellation token.
    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalyzeError {
    /// Wrap an arbitrary error in the catch-all [`Analysis`] variant,
    /// preserving it as the source.
    ///
    /// [`Analysis`]: AnalyzeError::Analysis
    pub fn wrap<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Analysis {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// HTTP status associated with the failure, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn transport_display_includes_message() {
        let err = AnalyzeError::Transport {
            status: Some(503),
            message: "analysis request failed with status 503".into(),
        };
        assert_eq!(
            err.to_string(),
            "transport failure: analysis request failed with status 503"
        );
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn analysis_display_is_stable() {
        let io = std::io::Error::other("socket vanished");
        let err = AnalyzeError::wrap(io);
        // The user-facing message never exposes the low-level cause.
        assert_eq!(err.to_string(), "failed to analyze video, please try again");
    }

    #[test]
    fn wrap_preserves_source() {
        let io = std::io::Error::other("socket vanished");
        let err = AnalyzeError::wrap(io);
        match &err {
            AnalyzeError::Analysis { message, .. } => {
                assert_eq!(message, "socket vanished");
            }
            other => panic!("Expected Analysis, got {other:?}"),
        }
        assert_eq!(err.source().unwrap().to_string(), "socket vanished");
    }

    #[test]
    fn protocol_and_cancelled_have_no_status() {
        assert_eq!(AnalyzeError::Protocol("no result".into()).status(), None);
        assert_eq!(AnalyzeError::Cancelled.status(), None);
    }
}
