//! Observer trait and implementations.

use crate::pipeline::PipelineRun;
use parking_lot::RwLock;
use tracing::{debug, info, warn, Level};

/// Receives a run after every status transition.
pub trait RunObserver: Send + Sync {
    /// Called after a transition. Must not block.
    fn on_transition(&self, run: &PipelineRun);
}

/// Discards all transitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RunObserver for NoOpObserver {
    fn on_transition(&self, _run: &PipelineRun) {}
}

/// Logs every transition through `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    level: Level,
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingObserver {
    /// Creates an observer logging at `level`; failures always log at warn.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level observer.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl RunObserver for LoggingObserver {
    fn on_transition(&self, run: &PipelineRun) {
        let current = run.current_stage().map(|s| s.to_string());
        let summary = run.status_summary();

        if let Some(error) = &run.error {
            warn!(
                version = run.version,
                run_id = %run.run_id,
                stages = %summary,
                error = %error,
                "pipeline run halted"
            );
            return;
        }

        if self.level == Level::DEBUG {
            debug!(
                version = run.version,
                run_id = %run.run_id,
                progress = run.progress(),
                current = ?current,
                stages = %summary,
                "pipeline transition"
            );
        } else {
            info!(
                version = run.version,
                run_id = %run.run_id,
                progress = run.progress(),
                current = ?current,
                stages = %summary,
                "pipeline transition"
            );
        }
    }
}

/// Records a snapshot of the run at every transition.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    snapshots: RwLock<Vec<PipelineRun>>,
}

impl CollectingObserver {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all snapshots.
    #[must_use]
    pub fn snapshots(&self) -> Vec<PipelineRun> {
        self.snapshots.read().clone()
    }

    /// Returns the progress value of each snapshot.
    #[must_use]
    pub fn progress_trace(&self) -> Vec<f64> {
        self.snapshots.read().iter().map(PipelineRun::progress).collect()
    }

    /// Returns the number of snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.read().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().is_empty()
    }

    /// Clears all snapshots.
    pub fn clear(&self) {
        self.snapshots.write().clear();
    }
}

impl RunObserver for CollectingObserver {
    fn on_transition(&self, run: &PipelineRun) {
        self.snapshots.write().push(run.clone());
    }
}
