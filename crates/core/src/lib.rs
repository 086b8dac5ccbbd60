//! Shared data contracts for the veridect analysis protocol.
//!
//! Defines the terminal [`types::AnalysisResult`] verdict shape, the
//! ordered [`progress::Stage`] narrative, and the
//! [`error::AnalyzeError`] taxonomy used by every analyzer
//! implementation.

pub mod error;
pub mod progress;
pub mod types;
