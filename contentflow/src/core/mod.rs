//! Core domain model types for contentflow.
//!
//! This module contains the fundamental types shared by the stage runner and
//! the orchestrator:
//! - Stage name and status enums
//! - Parsed stage output
//! - Per-run stage records

mod output;
mod record;
mod status;

pub use output::StageOutput;
pub use record::StageRecord;
pub use status::{StageName, StageStatus};
