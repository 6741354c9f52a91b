//! Testing utilities for contentflow pipelines.
//!
//! This module provides:
//! - A scripted language model
//! - Canned agent responses and requests
//! - Assertions over pipeline runs

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_halted_at, assert_run_succeeded, assert_stage_status, assert_statuses,
};
pub use fixtures::{
    brand_response, draft_response, full_script, plan_script, review_response,
    sample_plan_request, sample_request, search_analysis_response, strategy_response,
};
pub use mocks::{ScriptedModel, ScriptedReply};
