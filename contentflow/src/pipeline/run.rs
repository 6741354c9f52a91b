//! Pipeline run records.

use super::request::PipelineRequest;
use crate::core::{StageName, StageRecord, StageStatus};
use crate::errors::CollaboratorError;
use crate::fanout::GraphView;
use crate::parsing::{score_band, ParsedQuery, ScoreBand};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Approval label of a plan-mode result, which has no review.
pub const NOT_REVIEWED: &str = "Not Reviewed";

/// Aggregated outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    /// Final title.
    pub title: String,
    /// Final body.
    pub body: String,
    /// Approval label.
    pub approval: String,
    /// Score as written, e.g. "8/10".
    pub score: String,
    /// Reviewer comments.
    #[serde(default)]
    pub comments: String,
    /// Next-step suggestions by stage.
    #[serde(default)]
    pub next_steps: BTreeMap<StageName, Vec<String>>,
    /// Search queries from the analysis stage.
    #[serde(default)]
    pub queries: Vec<ParsedQuery>,
    /// Fan-out graph of the title and queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphView>,
}

impl FinalResult {
    /// Band of the score, for badges.
    #[must_use]
    pub fn score_band(&self) -> ScoreBand {
        score_band(&self.score)
    }
}

/// One execution of the pipeline, or one revision of an earlier execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Version number, unique per orchestrator.
    pub version: u64,
    /// Unique run id.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run ended, successfully or not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Input parameters.
    pub request: PipelineRequest,
    /// Stage records in execution order.
    pub stages: Vec<StageRecord>,
    /// Final result, once assembled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<FinalResult>,
    /// Queries extracted so far.
    #[serde(default)]
    pub queries: Vec<ParsedQuery>,
    /// The failure that halted the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CollaboratorError>,
    /// Version this run revises.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_of: Option<u64>,
    /// Feedback applied by this revision.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision_feedback: Option<String>,
}

impl PipelineRun {
    /// Creates a run with every stage pending.
    #[must_use]
    pub fn new(version: u64, request: PipelineRequest) -> Self {
        Self::with_stages(version, request, &StageName::ALL)
    }

    /// Creates a revision run with a single pending review stage.
    #[must_use]
    pub fn revision_of(version: u64, prior: &Self, feedback: impl Into<String>) -> Self {
        let mut run = Self::with_stages(version, prior.request.clone(), &[StageName::FinalReview]);
        run.revision_of = Some(prior.version);
        run.revision_feedback = Some(feedback.into());
        run.queries = prior.queries.clone();
        run
    }

    fn with_stages(version: u64, request: PipelineRequest, stages: &[StageName]) -> Self {
        Self {
            version,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            request,
            stages: stages.iter().copied().map(StageRecord::pending).collect(),
            result: None,
            queries: Vec::new(),
            error: None,
            revision_of: None,
            revision_feedback: None,
        }
    }

    /// Looks up a stage record.
    #[must_use]
    pub fn stage(&self, name: StageName) -> Option<&StageRecord> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub(crate) fn stage_mut(&mut self, name: StageName) -> Option<&mut StageRecord> {
        self.stages.iter_mut().find(|s| s.name == name)
    }

    /// Status of a stage, if the run has it.
    #[must_use]
    pub fn status_of(&self, name: StageName) -> Option<StageStatus> {
        self.stage(name).map(|s| s.status)
    }

    /// Body of a completed stage.
    #[must_use]
    pub fn body_of(&self, name: StageName) -> Option<&str> {
        self.stage(name).and_then(|s| s.output.as_deref())
    }

    /// The stage currently in progress.
    #[must_use]
    pub fn current_stage(&self) -> Option<StageName> {
        self.stages
            .iter()
            .find(|s| s.status == StageStatus::InProgress)
            .map(|s| s.name)
    }

    /// Fraction of non-skipped stages that completed, in `[0, 1]`.
    ///
    /// Derived from the stage records on every call.
    #[must_use]
    pub fn progress(&self) -> f64 {
        let active = self
            .stages
            .iter()
            .filter(|s| s.status != StageStatus::Skipped)
            .count();
        if active == 0 {
            return 0.0;
        }
        let completed = self.stages.iter().filter(|s| s.is_completed()).count();
        completed as f64 / active as f64
    }

    /// Returns true once the run has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }

    /// Returns true if the run ended with a final result and no error.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.result.is_some() && self.error.is_none()
    }

    /// Returns true for revision runs.
    #[must_use]
    pub fn is_revision(&self) -> bool {
        self.revision_of.is_some()
    }

    /// Compact `stage=status` listing for logs.
    #[must_use]
    pub fn status_summary(&self) -> String {
        self.stages
            .iter()
            .map(|s| format!("{}={}", s.name, s.status))
            .collect::<Vec<_>>()
            .join(",")
    }
}
