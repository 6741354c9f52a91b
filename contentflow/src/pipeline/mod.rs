//! The content pipeline: requests, runs and the orchestrator.

mod orchestrator;
mod request;
mod run;


pub use orchestrator::PipelineOrchestrator;
pub use request::{PipelineMode, PipelineRequest, CONTENT_TYPES, DEFAULT_BRAND_VOICE};
pub use run::{FinalResult, PipelineRun, NOT_REVIEWED};
