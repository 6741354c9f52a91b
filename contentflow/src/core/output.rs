//! Parsed output of one stage invocation.

use super::StageName;
use crate::parsing::{ParsedQuery, Verdict};
use serde::{Deserialize, Serialize};

/// Structured view of an agent's free-text response.
///
/// Which fields are populated depends on the stage: every stage has a body,
/// the drafting stages carry next-step suggestions, search analysis carries
/// queries and final review carries a verdict. The value is folded into the
/// run's [`StageRecord`](super::StageRecord) and never stored on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOutput {
    /// The stage that produced this output.
    pub stage: StageName,
    /// The untouched collaborator response.
    pub raw: String,
    /// Main body text with any next-steps section removed.
    pub body: String,
    /// Next-step suggestions in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
    /// Search queries (search analysis only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<ParsedQuery>,
    /// Editorial verdict (final review only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

impl StageOutput {
    /// Creates an output whose body is the whole raw text.
    #[must_use]
    pub fn new(stage: StageName, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        Self {
            stage,
            body: raw.trim().to_string(),
            raw,
            next_steps: Vec::new(),
            queries: Vec::new(),
            verdict: None,
        }
    }

    /// Replaces the body and next steps.
    #[must_use]
    pub fn with_split(mut self, body: impl Into<String>, next_steps: Vec<String>) -> Self {
        self.body = body.into();
        self.next_steps = next_steps;
        self
    }

    /// Sets the query list.
    #[must_use]
    pub fn with_queries(mut self, queries: Vec<ParsedQuery>) -> Self {
        self.queries = queries;
        self
    }

    /// Sets the verdict.
    #[must_use]
    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    /// Returns true if the agent offered next steps.
    #[must_use]
    pub fn has_next_steps(&self) -> bool {
        !self.next_steps.is_empty()
    }
}
