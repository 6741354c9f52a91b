//! Extraction of structured results from agents' free-text responses.
//!
//! Every extraction degrades to documented defaults instead of failing. The
//! heading-matching rules live behind [`OutputParser`] so a structured-output
//! contract with the model can replace them without touching the runner or
//! the orchestrator.

mod next_steps;
mod queries;
mod verdict;

pub use next_steps::{split_next_steps, NextStepsSplit, NEXT_STEPS_HEADING};
pub use queries::{extract_queries, ParsedQuery};
pub use verdict::{
    extract_revision, extract_verdict, score_band, Revision, ScoreBand, Verdict,
    DEFAULT_APPROVAL, DEFAULT_REVISION_SCORE, DEFAULT_SCORE, NEEDS_REVISION,
};

use std::fmt::Debug;

/// Turns raw agent text into stage results.
pub trait OutputParser: Send + Sync + Debug {
    /// Splits the body from its next-step suggestions.
    fn split_next_steps(&self, text: &str) -> NextStepsSplit;

    /// Extracts the search-query list.
    fn extract_queries(&self, text: &str) -> Vec<ParsedQuery>;

    /// Extracts the reviewer verdict; `topic` is the default title.
    fn extract_verdict(&self, text: &str, topic: &str) -> Verdict;

    /// Splits a revision response into body, approval and score.
    fn extract_revision(&self, text: &str) -> Revision;
}

/// Parser that locates sections by their free-text headings and labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadingOutputParser;

impl OutputParser for HeadingOutputParser {
    fn split_next_steps(&self, text: &str) -> NextStepsSplit {
        split_next_steps(text)
    }

    fn extract_queries(&self, text: &str) -> Vec<ParsedQuery> {
        extract_queries(text)
    }

    fn extract_verdict(&self, text: &str, topic: &str) -> Verdict {
        extract_verdict(text, topic)
    }

    fn extract_revision(&self, text: &str) -> Revision {
        extract_revision(text)
    }
}
