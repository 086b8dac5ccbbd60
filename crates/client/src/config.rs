//! Client configuration loaded from environment variables.

use std::time::Duration;

/// Connection settings for a
/// [`DetectionClient`](crate::client::DetectionClient).
///
/// All fields have defaults suitable for a backend running locally.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL, without the trailing `/analyze` path.
    pub base_url: String,
    /// Upper bound on one upload + analysis round trip.
    pub upload_timeout: Duration,
}

/// Fallback base URL when `VERIDECT_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Fallback upload timeout in seconds.
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 300;

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                        | Default                     |
    /// |--------------------------------|-----------------------------|
    /// | `VERIDECT_API_URL`             | `http://localhost:8000/api` |
    /// | `VERIDECT_UPLOAD_TIMEOUT_SECS` | `300`                       |
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("VERIDECT_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let upload_timeout_secs: u64 = std::env::var("VERIDECT_UPLOAD_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_TIMEOUT_SECS.to_string())
            .parse()
            .expect("VERIDECT_UPLOAD_TIMEOUT_SECS must be a valid u64");

        Self {
            base_url,
            upload_timeout: Duration::from_secs(upload_timeout_secs),
        }
    }

    /// Configuration pointing at an explicit base URL, default timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            upload_timeout: Duration::from_secs(DEFAULT_UPLOAD_TIMEOUT_SECS),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}
