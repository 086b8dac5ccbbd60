//! Client library for a deepfake-detection backend.
//!
//! [`DetectionClient`] uploads a video to the backend and reconciles the
//! response into a single verdict. Backends that stream
//! newline-delimited progress events drive the caller's observer
//! directly; plain-JSON backends get a locally simulated progress
//! schedule so the narrative keeps moving either way.
//! [`MockAnalyzer`] provides the same [`Analyzer`] contract with no
//! backend at all.

pub mod client;
pub mod config;
pub mod decode;
pub mod events;
pub mod mock;
pub mod reducer;
pub mod schedule;

pub use client::{Analyzer, DetectionClient, VideoUpload};
pub use config::ClientConfig;
pub use mock::MockAnalyzer;
