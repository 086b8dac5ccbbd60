//! Command-line entry point: upload one video and print the verdict.
//!
//! The composition root owns the analyzer choice: `VERIDECT_MOCK=1`
//! selects the backend-free [`MockAnalyzer`], anything else builds a
//! [`DetectionClient`] from the environment.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veridect_client::client::{Analyzer, DetectionClient, VideoUpload};
use veridect_client::config::ClientConfig;
use veridect_client::mock::MockAnalyzer;
use veridect_core::progress::ProgressObserver;
use veridect_core::types::AnalysisResult;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "veridect=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(path) = std::env::args().nth(1).map(PathBuf::from) else {
        eprintln!("usage: veridect <video-file>");
        return ExitCode::from(2);
    };

    let video = match VideoUpload::from_path(&path).await {
        Ok(video) => video,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Could not read video file");
            return ExitCode::FAILURE;
        }
    };

    let observer: ProgressObserver = Box::new(|stage, percent| {
        tracing::info!(%stage, percent = percent as u32, "Progress");
    });

    let use_mock = std::env::var("VERIDECT_MOCK").map(|v| v == "1").unwrap_or(false);
    let analyzer: Box<dyn Analyzer> = if use_mock {
        tracing::info!("Using mock analyzer, no backend will be contacted");
        Box::new(MockAnalyzer::new())
    } else {
        let config = ClientConfig::from_env();
        tracing::info!(base_url = %config.base_url, "Using HTTP backend");
        Box::new(DetectionClient::new(config))
    };

    match analyzer.analyze(video, Some(observer)).await {
        Ok(verdict) => {
            print_verdict(&verdict);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Analysis failed");
            ExitCode::FAILURE
        }
    }
}

fn print_verdict(verdict: &AnalysisResult) {
    println!("prediction:  {}", verdict.prediction);
    println!("confidence:  {}%", verdict.confidence);
    println!("explanation: {}", verdict.explanation);
    if let Some(frames) = &verdict.frame_analysis {
        println!(
            "frames:      {}/{} suspicious",
            frames.suspicious_frames, frames.total_frames
        );
        for artifact in &frames.artifacts {
            println!("  - {artifact}");
        }
    }
}
