//! Progress narrative reduction.
//!
//! Raw progress reports may come from a backend stream, from the local
//! simulated schedule, or both. [`ProgressReducer`] sits between those
//! producers and the caller's observer and guarantees the contract:
//! stage ordinals never move backwards, percent never decreases within
//! a stage, and `(complete, 100)` is delivered exactly once, last.

use std::sync::Mutex;

use veridect_core::progress::{ProgressObserver, Stage};

/// Per-run narrative state.
#[derive(Debug, Clone, Copy)]
struct ReducerState {
    stage: Stage,
    percent: f64,
    sealed: bool,
}

/// Reconciles raw stage/percent reports into a well-formed narrative
/// for one run.
///
/// Shared by reference between concurrent producers within the run,
/// hence the interior mutability. The observer is invoked while the
/// state lock is held so delivery order matches reduction order;
/// observers must not call back into the reducer.
pub struct ProgressReducer {
    observer: Option<ProgressObserver>,
    state: Mutex<ReducerState>,
}

impl ProgressReducer {
    /// Create a reducer for one run.
    ///
    /// With `observer` of `None` events are still validated and folded,
    /// just delivered nowhere.
    pub fn new(observer: Option<ProgressObserver>) -> Self {
        Self {
            observer,
            state: Mutex::new(ReducerState {
                stage: Stage::Uploading,
                percent: 0.0,
                sealed: false,
            }),
        }
    }

    /// Report a raw progress event.
    ///
    /// Events for an earlier stage are dropped, within-stage regressions
    /// are clamped to the high-water mark, and percent is clamped to
    /// [0, 100]. A percent reset is only possible when the stage
    /// advances. `complete`-stage reports are dropped too: the terminal
    /// event comes exclusively from [`complete`](Self::complete).
    pub fn report(&self, stage: Stage, percent: f64) {
        let state = &mut *self.state.lock().unwrap();
        if state.sealed {
            tracing::debug!(%stage, percent, "Dropping progress after completion");
            return;
        }
        if stage == Stage::Complete {
            tracing::debug!(percent, "Dropping explicit complete report");
            return;
        }
        if stage < state.stage {
            tracing::debug!(
                %stage,
                percent,
                current = %state.stage,
                "Dropping stale-stage progress",
            );
            return;
        }

        let mut percent = percent.clamp(0.0, 100.0);
        if stage == state.stage {
            percent = percent.max(state.percent);
        }
        state.stage = stage;
        state.percent = percent;

        if let Some(observer) = &self.observer {
            observer(stage, percent);
        }
    }

    /// Emit the terminal `(complete, 100)` event and seal the reducer.
    ///
    /// Idempotent: only the first call delivers anything. After sealing,
    /// every further report is dropped.
    pub fn complete(&self) {
        let state = &mut *self.state.lock().unwrap();
        if state.sealed {
            return;
        }
        state.sealed = true;
        state.stage = Stage::Complete;
        state.percent = 100.0;

        if let Some(observer) = &self.observer {
            observer(Stage::Complete, 100.0);
        }
    }
}
