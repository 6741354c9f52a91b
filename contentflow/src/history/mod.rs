//! In-memory version history of successful runs.

use crate::errors::{ContentflowError, Result};
use crate::pipeline::PipelineRun;
use parking_lot::RwLock;
use tracing::debug;

/// Append-only list of successful runs and revisions, oldest first.
#[derive(Debug, Default)]
pub struct VersionHistory {
    runs: RwLock<Vec<PipelineRun>>,
}

impl VersionHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a run. Runs without a final result, and versions already
    /// present, are rejected.
    pub fn push(&self, run: PipelineRun) -> Result<()> {
        if !run.is_successful() {
            return Err(ContentflowError::invalid_request(format!(
                "run {} did not produce a final result",
                run.version
            )));
        }
        let mut runs = self.runs.write();
        if runs.iter().any(|r| r.version == run.version) {
            return Err(ContentflowError::invalid_request(format!(
                "version {} is already recorded",
                run.version
            )));
        }
        debug!(version = run.version, revision_of = ?run.revision_of, "version recorded");
        runs.push(run);
        Ok(())
    }

    /// The most recent run.
    #[must_use]
    pub fn latest(&self) -> Option<PipelineRun> {
        self.runs.read().last().cloned()
    }

    /// Looks up a run by version.
    #[must_use]
    pub fn get(&self, version: u64) -> Option<PipelineRun> {
        self.runs.read().iter().find(|r| r.version == version).cloned()
    }

    /// All runs, newest first.
    #[must_use]
    pub fn iter_newest_first(&self) -> Vec<PipelineRun> {
        self.runs.read().iter().rev().cloned().collect()
    }

    /// Version to hand to the next orchestrator so numbering continues.
    #[must_use]
    pub fn next_version(&self) -> u64 {
        self.runs.read().iter().map(|r| r.version).max().map_or(1, |v| v + 1)
    }

    /// Number of recorded runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.read().len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{FinalResult, PipelineRequest};
    use std::collections::BTreeMap;

    fn finished(version: u64) -> PipelineRun {
        let mut run = PipelineRun::new(version, PipelineRequest::new("Compost"));
        run.result = Some(FinalResult {
            title: format!("v{version}"),
            body: "Body".to_string(),
            approval: "Approved".to_string(),
            score: "8/10".to_string(),
            comments: String::new(),
            next_steps: BTreeMap::new(),
            queries: Vec::new(),
            graph: None,
        });
        run
    }

    #[test]
    fn test_push_and_lookup() {
        let history = VersionHistory::new();
        assert!(history.is_empty());
        assert_eq!(history.next_version(), 1);

        history.push(finished(1)).unwrap();
        history.push(PipelineRun::revision_of(2, &finished(1), "tighter")).unwrap_err();
        let mut revision = PipelineRun::revision_of(2, &finished(1), "tighter");
        revision.result = finished(2).result;
        history.push(revision).unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history.latest().unwrap().version, 2);
        assert!(history.get(2).unwrap().is_revision());
        assert!(history.get(9).is_none());
        assert_eq!(history.next_version(), 3);
        let versions: Vec<u64> = history.iter_newest_first().iter().map(|r| r.version).collect();
        assert_eq!(versions, vec![2, 1]);
    }

    #[test]
    fn test_rejects_failed_and_duplicate_runs() {
        let history = VersionHistory::new();
        let err = history.push(PipelineRun::new(1, PipelineRequest::new("t"))).unwrap_err();
        assert!(err.to_string().contains("did not produce"));

        history.push(finished(4)).unwrap();
        assert!(history.push(finished(4)).is_err());
        assert_eq!(history.len(), 1);
    }
}
