//! Simulated progress schedule.
//!
//! When the backend answers with a plain JSON body there is no
//! incremental telemetry, but the caller still expects a moving
//! progress narrative. [`Schedule`] plays a fixed sequence of stages
//! with nominal durations, emitting evenly spaced percent steps. The
//! playback is cosmetic: it carries no signal about the real analysis
//! and must never be read as one.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use veridect_core::progress::Stage;

use crate::reducer::ProgressReducer;

/// Default number of percent steps per stage.
pub const DEFAULT_STEPS: u32 = 20;

/// One stage of the simulated narrative with its nominal duration.
#[derive(Debug, Clone, Copy)]
pub struct StageTiming {
    pub stage: Stage,
    pub duration: Duration,
}

/// A fixed playback plan for the simulated progress narrative.
#[derive(Debug, Clone)]
pub struct Schedule {
    entries: Vec<StageTiming>,
    steps: u32,
}

impl Default for Schedule {
    /// uploading 1500 ms, extracting 2000 ms, analyzing 3000 ms, at
    /// [`DEFAULT_STEPS`] steps per stage.
    fn default() -> Self {
        Self::new(
            vec![
                StageTiming {
                    stage: Stage::Uploading,
                    duration: Duration::from_millis(1500),
                },
                StageTiming {
                    stage: Stage::Extracting,
                    duration: Duration::from_millis(2000),
                },
                StageTiming {
                    stage: Stage::Analyzing,
                    duration: Duration::from_millis(3000),
                },
            ],
            DEFAULT_STEPS,
        )
    }
}

impl Schedule {
    /// Build a custom schedule.
    ///
    /// A `steps` of 0 falls back to [`DEFAULT_STEPS`].
    pub fn new(entries: Vec<StageTiming>, steps: u32) -> Self {
        let steps = if steps == 0 { DEFAULT_STEPS } else { steps };
        Self { entries, steps }
    }

    /// A uniform schedule giving every default stage the same duration
    /// (handy for tests that should not sleep for seconds).
    pub fn uniform(per_stage: Duration) -> Self {
        let mut schedule = Self::default();
        for entry in &mut schedule.entries {
            entry.duration = per_stage;
        }
        schedule
    }

    /// Total nominal duration of the playback.
    pub fn total_duration(&self) -> Duration {
        self.entries.iter().map(|e| e.duration).sum()
    }

    /// Play the schedule against `reducer`, sleeping between steps.
    ///
    /// Each stage emits percents `0, 100/steps, ..., 100` in order,
    /// with a pause of `duration / steps` after every emission. Returns
    /// `false` when `cancel` trips before the playback finishes; the
    /// caller decides what a cancelled run means.
    pub async fn play(&self, reducer: &ProgressReducer, cancel: &CancellationToken) -> bool {
        for entry in &self.entries {
            let pause = entry.duration / self.steps;
            for step in 0..=self.steps {
                let percent = f64::from(step) / f64::from(self.steps) * 100.0;
                reducer.report(entry.stage, percent);

                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!(stage = %entry.stage, percent, "Schedule playback cancelled");
                        return false;
                    }
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    fn recording_reducer() -> (ProgressReducer, Arc<Mutex<Vec<(Stage, f64)>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let reducer = ProgressReducer::new(Some(Box::new(move |stage, percent| {
            sink.lock().unwrap().push((stage, percent));
        })));
        (reducer, log)
    }

    #[test]
    fn default_schedule_totals_six_and_a_half_seconds() {
        assert_eq!(Schedule::default().total_duration(), Duration::from_millis(6500));
    }

    #[test]
    fn zero_steps_falls_back_to_default() {
        let schedule = Schedule::new(vec![], 0);
        assert_eq!(schedule.steps, DEFAULT_STEPS);
    }

    #[tokio::test(start_paused = true)]
    async fn uploading_emits_five_percent_steps() {
        let (reducer, log) = recording_reducer();
        let cancel = CancellationToken::new();
        assert!(Schedule::default().play(&reducer, &cancel).await);

        let events = log.lock().unwrap();
        let uploading: Vec<f64> = events
            .iter()
            .take_while(|(stage, _)| *stage == Stage::Uploading)
            .map(|&(_, percent)| percent)
            .collect();
        let expected: Vec<f64> = (0..=20).map(|i| f64::from(i) * 5.0).collect();
        assert_eq!(uploading, expected);
        // The stage after the uploading block is extracting, at 0.
        assert_eq!(events[21], (Stage::Extracting, 0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn full_playback_emits_every_stage_in_order() {
        let (reducer, log) = recording_reducer();
        let cancel = CancellationToken::new();
        assert!(Schedule::default().play(&reducer, &cancel).await);

        let events = log.lock().unwrap();
        // 21 events per stage, three stages.
        assert_eq!(events.len(), 63);
        let stages: Vec<Stage> = events.iter().map(|&(stage, _)| stage).collect();
        assert!(stages.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(events[0], (Stage::Uploading, 0.0));
        assert_eq!(events[62], (Stage::Analyzing, 100.0));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_stops_playback_early() {
        let (reducer, log) = recording_reducer();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let finished = Schedule::default().play(&reducer, &cancel).await;
        assert!(!finished);
        // Only the very first step got out before the token was observed.
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn uniform_schedule_keeps_stage_order() {
        let (reducer, log) = recording_reducer();
        let cancel = CancellationToken::new();
        let schedule = Schedule::uniform(Duration::from_millis(20));
        assert!(schedule.play(&reducer, &cancel).await);

        let events = log.lock().unwrap();
        assert_eq!(events.len(), 63);
        assert_eq!(events.last().unwrap().0, Stage::Analyzing);
    }
}
