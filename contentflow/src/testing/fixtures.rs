//! Canned requests and agent responses.

use super::mocks::ScriptedModel;
use crate::pipeline::{PipelineMode, PipelineRequest};

/// A filled-in full-mode request.
#[must_use]
pub fn sample_request() -> PipelineRequest {
    PipelineRequest::new("Benefits of Sustainable Packaging")
        .with_audience("Tech-savvy consumers aged 20-30")
        .with_length("Medium (600-800 words)")
        .with_key_messages("Lower costs; happier customers")
        .with_keywords("sustainable packaging, eco-friendly")
        .with_compliance("No medical claims")
}

/// Strategist reply with an outline and next steps.
#[must_use]
pub fn strategy_response() -> String {
    "## Title\nPackaging That Pays Off\n\n## Outline\n1. Why it matters\n2. Costs\n\n### Next Steps\n- Gather cost data\n- Interview a supplier".to_string()
}

/// SEO reply with four search queries.
#[must_use]
pub fn search_analysis_response() -> String {
    "Intent is mostly informational.\n\nSearch Queries:\n- Reformulation: what is sustainable packaging - definitional\n- Comparative: compostable vs recyclable mailers\n- Temporal: packaging regulations 2025\n- Implicit: eco-friendly shipping boxes\n\n### Next Steps\n- Target the comparative query".to_string()
}

/// Writer reply.
#[must_use]
pub fn draft_response() -> String {
    "# Packaging That Pays Off\n\nSustainable packaging cuts costs.\n\n### Next Steps\n- Add a case study".to_string()
}

/// Head-of-content reply.
#[must_use]
pub fn brand_response() -> String {
    "# Packaging That Pays Off\n\nSustainable packaging cuts costs and wins loyalty.\n\n### Next Steps\n- Check the CTA".to_string()
}

/// Editor reply with a complete verdict.
#[must_use]
pub fn review_response() -> String {
    "Strong piece.\nAPPROVAL: Approved\nSCORE: 9/10\nCOMMENTS: Clear and persuasive.\nFINAL_TITLE: Packaging That Pays Off".to_string()
}

/// A model scripted for one successful full run.
#[must_use]
pub fn full_script() -> ScriptedModel {
    ScriptedModel::new()
        .reply(strategy_response())
        .reply(search_analysis_response())
        .reply(draft_response())
        .reply(brand_response())
        .reply(review_response())
}

/// A model scripted for one successful plan-mode run.
#[must_use]
pub fn plan_script() -> ScriptedModel {
    ScriptedModel::new()
        .reply(strategy_response())
        .reply(search_analysis_response())
        .reply(brand_response())
}

/// The sample request in plan mode.
#[must_use]
pub fn sample_plan_request() -> PipelineRequest {
    sample_request().with_mode(PipelineMode::Plan)
}
