//! Assertions over pipeline runs.

use crate::core::{StageName, StageStatus};
use crate::pipeline::PipelineRun;

/// Asserts that `stage` has the expected status.
pub fn assert_stage_status(run: &PipelineRun, stage: StageName, expected: StageStatus) {
    let actual = run.status_of(stage);
    assert_eq!(
        actual,
        Some(expected),
        "Expected {stage} to be {expected}, got {actual:?} ({})",
        run.status_summary()
    );
}

/// Asserts the status of every stage, in order.
pub fn assert_statuses(run: &PipelineRun, expected: &[StageStatus]) {
    let actual: Vec<StageStatus> = run.stages.iter().map(|s| s.status).collect();
    assert_eq!(actual, expected, "Stage statuses: {}", run.status_summary());
}

/// Asserts that the run finished with a result and no error.
pub fn assert_run_succeeded(run: &PipelineRun) {
    assert!(
        run.is_successful(),
        "Expected success, got error {:?} ({})",
        run.error,
        run.status_summary()
    );
}

/// Asserts that the run halted on `stage` with the error attributed to it.
pub fn assert_halted_at(run: &PipelineRun, stage: StageName) {
    assert!(!run.is_successful(), "Expected failure, run succeeded");
    assert!(run.result.is_none(), "A halted run must not have a result");
    assert_stage_status(run, stage, StageStatus::Failed);
    assert_eq!(
        run.error.as_ref().and_then(|e| e.stage),
        Some(stage),
        "Error not attributed to {stage}: {:?}",
        run.error
    );
}
