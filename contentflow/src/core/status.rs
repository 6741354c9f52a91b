//! Stage name and status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed, ordered set of content-production stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    /// Content strategy and outline.
    Strategy,
    /// Search-intent analysis that proposes seed queries.
    SearchAnalysis,
    /// Full draft.
    Draft,
    /// Brand, flow and compliance polish.
    BrandRefinement,
    /// Editorial verdict.
    FinalReview,
}

impl StageName {
    /// All stages in execution order.
    pub const ALL: [Self; 5] = [
        Self::Strategy,
        Self::SearchAnalysis,
        Self::Draft,
        Self::BrandRefinement,
        Self::FinalReview,
    ];

    /// Returns the zero-based position of the stage in execution order.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Strategy => 0,
            Self::SearchAnalysis => 1,
            Self::Draft => 2,
            Self::BrandRefinement => 3,
            Self::FinalReview => 4,
        }
    }

    /// Returns the agent role that performs this stage.
    #[must_use]
    pub fn agent_role(self) -> &'static str {
        match self {
            Self::Strategy => "Strategist",
            Self::SearchAnalysis => "SEO Specialist",
            Self::Draft => "Specialist Writer",
            Self::BrandRefinement => "Head of Content",
            Self::FinalReview => "Editor-in-Chief",
        }
    }

    /// Returns true if plan mode leaves this stage out.
    #[must_use]
    pub fn skipped_in_plan_mode(self) -> bool {
        matches!(self, Self::Draft | Self::FinalReview)
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strategy => write!(f, "strategy"),
            Self::SearchAnalysis => write!(f, "search_analysis"),
            Self::Draft => write!(f, "draft"),
            Self::BrandRefinement => write!(f, "brand_refinement"),
            Self::FinalReview => write!(f, "final_review"),
        }
    }
}

/// The execution status of a stage within one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Created, run not started yet.
    Pending,
    /// Scheduled to run in this pipeline run.
    Queued,
    /// Currently waiting on the collaborator.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Left out by plan mode.
    Skipped,
    /// The collaborator call failed; the run halted here.
    Failed,
}

impl Default for StageStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Queued => write!(f, "queued"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl StageStatus {
    /// Returns true if the status represents a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped | Self::Failed)
    }

    /// Returns true if the status indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if the status indicates failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns true if moving from `self` to `next` is a forward transition.
    ///
    /// Terminal states never transition again.
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, Self::Queued | Self::Skipped) => true,
            (Self::Queued, Self::InProgress) => true,
            (Self::InProgress, Self::Completed | Self::Failed) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_name_order() {
        let mut shuffled = vec![
            StageName::FinalReview,
            StageName::Strategy,
            StageName::BrandRefinement,
            StageName::SearchAnalysis,
            StageName::Draft,
        ];
        shuffled.sort();
        assert_eq!(shuffled, StageName::ALL.to_vec());

        for (i, stage) in StageName::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn test_stage_name_display() {
        assert_eq!(StageName::SearchAnalysis.to_string(), "search_analysis");
        assert_eq!(StageName::FinalReview.agent_role(), "Editor-in-Chief");
    }

    #[test]
    fn test_plan_mode_skips() {
        let skipped: Vec<_> = StageName::ALL
            .into_iter()
            .filter(|s| s.skipped_in_plan_mode())
            .collect();
        assert_eq!(skipped, vec![StageName::Draft, StageName::FinalReview]);
    }

    #[test]
    fn test_stage_status_is_terminal() {
        assert!(StageStatus::Completed.is_terminal());
        assert!(StageStatus::Skipped.is_terminal());
        assert!(StageStatus::Failed.is_terminal());
        assert!(!StageStatus::Queued.is_terminal());
        assert!(!StageStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_forward_transitions_only() {
        assert!(StageStatus::Pending.can_transition_to(StageStatus::Queued));
        assert!(StageStatus::Queued.can_transition_to(StageStatus::InProgress));
        assert!(StageStatus::InProgress.can_transition_to(StageStatus::Failed));
        assert!(!StageStatus::Completed.can_transition_to(StageStatus::InProgress));
        assert!(!StageStatus::Skipped.can_transition_to(StageStatus::Queued));
        assert!(!StageStatus::Queued.can_transition_to(StageStatus::Completed));
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::InProgress).unwrap();
        assert_eq!(json, r#""in_progress""#);

        let deserialized: StageStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, StageStatus::InProgress);
    }
}
