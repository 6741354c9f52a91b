//! Per-run record of one stage.

use super::{StageName, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The state of one stage inside a [`PipelineRun`](crate::pipeline::PipelineRun).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Stage name.
    pub name: StageName,
    /// Current status.
    pub status: StageStatus,
    /// Body text once completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Extracted next-step suggestions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<String>>,
    /// When the stage went in progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// When the stage reached a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    /// Error message if failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageRecord {
    /// Creates a pending record.
    #[must_use]
    pub fn pending(name: StageName) -> Self {
        Self {
            name,
            status: StageStatus::Pending,
            output: None,
            next_steps: None,
            started_at: None,
            ended_at: None,
            error: None,
        }
    }

    /// Moves to `next` if that is a forward transition, stamping the start
    /// or end time. Returns false and leaves the record alone otherwise.
    pub fn advance(&mut self, next: StageStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        match next {
            StageStatus::InProgress => self.started_at = Some(Utc::now()),
            StageStatus::Completed | StageStatus::Failed => self.ended_at = Some(Utc::now()),
            _ => {}
        }
        true
    }

    /// Returns the duration in milliseconds, once the stage has ended.
    #[must_use]
    pub fn duration_ms(&self) -> Option<i64> {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
            _ => None,
        }
    }

    /// Returns true if the stage finished successfully.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_record() {
        let record = StageRecord::pending(StageName::Draft);
        assert_eq!(record.status, StageStatus::Pending);
        assert!(record.output.is_none());
        assert!(record.duration_ms().is_none());
        assert!(!record.is_completed());
    }

    #[test]
    fn test_advance_stamps_times() {
        let mut record = StageRecord::pending(StageName::Draft);
        assert!(!record.advance(StageStatus::InProgress));
        assert!(record.advance(StageStatus::Queued));
        assert!(record.advance(StageStatus::InProgress));
        assert!(record.started_at.is_some());
        assert!(record.advance(StageStatus::Completed));
        assert!(record.duration_ms().is_some());
        assert!(!record.advance(StageStatus::Failed));
        assert_eq!(record.status, StageStatus::Completed);
    }

    #[test]
    fn test_duration() {
        let mut record = StageRecord::pending(StageName::Strategy);
        let start = Utc::now();
        record.started_at = Some(start);
        record.ended_at = Some(start + chrono::Duration::milliseconds(250));
        assert_eq!(record.duration_ms(), Some(250));
    }
}
