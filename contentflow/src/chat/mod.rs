//! Per-agent chat about the current content.
//!
//! Every stage's agent keeps its own transcript. A question is sent with the
//! agent's instruction profile and a context block describing the content
//! under discussion; the exchange is recorded only when the agent answers.

use crate::config::ContentflowConfig;
use crate::core::StageName;
use crate::errors::{ContentflowError, Result};
use crate::helpers::non_blank_or;
use crate::pipeline::{FinalResult, PipelineOrchestrator};
use crate::providers::Credentials;
use crate::stages::{instruction_profile, StageRunner};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person asking.
    User,
    /// The stage agent.
    Assistant,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author.
    pub role: ChatRole,
    /// Message text.
    pub content: String,
    /// When the message was recorded.
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// Chat sessions with the five stage agents.
#[derive(Debug)]
pub struct AgentChat {
    runner: StageRunner,
    preview_chars: usize,
    transcripts: DashMap<StageName, Vec<ChatMessage>>,
}

impl AgentChat {
    /// Creates a chat using `runner` for collaborator calls.
    #[must_use]
    pub fn new(runner: StageRunner, config: &ContentflowConfig) -> Self {
        Self {
            runner,
            preview_chars: config.chat_preview_chars,
            transcripts: DashMap::new(),
        }
    }

    /// Creates a chat sharing the orchestrator's model and settings.
    #[must_use]
    pub fn for_orchestrator(orchestrator: &PipelineOrchestrator) -> Self {
        Self::new(orchestrator.runner().clone(), orchestrator.config())
    }

    /// Asks `stage`'s agent about `content` and returns the answer.
    ///
    /// On failure neither the question nor an answer is recorded.
    pub async fn ask(
        &self,
        stage: StageName,
        message: &str,
        content: &FinalResult,
        credentials: &Credentials,
    ) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ContentflowError::invalid_request("chat message must not be blank"));
        }

        let context = context_block(content, self.preview_chars);
        debug!(stage = %stage, chars = message.len(), "asking agent");
        let answer = self
            .runner
            .complete(Some(stage), instruction_profile(stage), &context, message, credentials)
            .await?;

        let mut transcript = self.transcripts.entry(stage).or_default();
        transcript.push(ChatMessage::new(ChatRole::User, message));
        transcript.push(ChatMessage::new(ChatRole::Assistant, answer.clone()));
        info!(stage = %stage, messages = transcript.len(), "agent answered");
        Ok(answer)
    }

    /// Returns a copy of `stage`'s transcript, oldest first.
    #[must_use]
    pub fn transcript(&self, stage: StageName) -> Vec<ChatMessage> {
        self.transcripts
            .get(&stage)
            .map(|t| t.value().clone())
            .unwrap_or_default()
    }

    /// Clears one transcript.
    pub fn clear(&self, stage: StageName) {
        self.transcripts.remove(&stage);
    }

    /// Clears every transcript.
    pub fn clear_all(&self) {
        self.transcripts.clear();
    }
}

/// Describes the content under discussion: title, score and the start of
/// the body followed by `...`.
#[must_use]
pub fn context_block(content: &FinalResult, preview_chars: usize) -> String {
    let preview: String = content.body.chars().take(preview_chars).collect();
    format!(
        "Current content being discussed:\nTitle: {}\nScore: {}\n\nContent preview:\n{preview}...",
        non_blank_or(&content.title, "N/A"),
        non_blank_or(&content.score, "N/A"),
    )
}
