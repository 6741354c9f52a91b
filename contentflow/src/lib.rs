//! # Contentflow
//!
//! A staged content-production pipeline driven by a language model.
//!
//! A request passes through five agents in order, each seeing the output of
//! the ones before it:
//!
//! - **Strategy**: outline and angle
//! - **Search analysis**: search intent and a typed query list
//! - **Draft**: the full piece
//! - **Brand refinement**: voice and compliance pass
//! - **Final review**: approval, score, comments and title
//!
//! The queries feed a deterministic fan-out graph built from hash-seeded
//! embeddings, so the same title and queries always give the same graph.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use contentflow::prelude::*;
//! use std::sync::Arc;
//!
//! let model = Arc::new(OpenAiChatModel::new()?);
//! let orchestrator = PipelineOrchestrator::new(model, ContentflowConfig::default());
//!
//! let request = PipelineRequest::new("Benefits of Sustainable Packaging")
//!     .with_audience("Small online retailers");
//! let run = orchestrator.run(request, &Credentials::new(api_key)).await?;
//!
//! if let Some(result) = &run.result {
//!     println!("{} ({})", result.title, result.score);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod chat;
pub mod classify;
pub mod config;
pub mod core;
pub mod embedding;
pub mod errors;
pub mod events;
pub mod export;
pub mod fanout;
pub mod helpers;
pub mod history;
pub mod observability;
pub mod parsing;
pub mod pipeline;
pub mod providers;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::chat::{AgentChat, ChatMessage, ChatRole};
    pub use crate::classify::{QueryClassifier, QueryType};
    pub use crate::config::ContentflowConfig;
    pub use crate::core::{StageName, StageOutput, StageRecord, StageStatus};
    pub use crate::embedding::TextEmbedder;
    pub use crate::errors::{CollaboratorError, ContentflowError};
    pub use crate::events::{CollectingObserver, LoggingObserver, NoOpObserver, RunObserver};
    pub use crate::export::ExportFormat;
    pub use crate::fanout::{FanoutConfig, GraphView, QueryFanoutBuilder, QueryGraph};
    pub use crate::history::VersionHistory;
    pub use crate::observability::{init_logging, LogFormat};
    pub use crate::parsing::{HeadingOutputParser, OutputParser, ParsedQuery, Verdict};
    pub use crate::pipeline::{
        FinalResult, PipelineMode, PipelineOrchestrator, PipelineRequest, PipelineRun,
    };
    #[cfg(feature = "openai")]
    pub use crate::providers::OpenAiChatModel;
    pub use crate::providers::{CompletionRequest, Credentials, LanguageModel, ModelChoice};
    pub use crate::stages::StageRunner;
}
