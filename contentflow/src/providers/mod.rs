//! Language-model collaborator boundary.
//!
//! The pipeline only needs "instruction profile + context + prompt in, text
//! out". Implementations return `anyhow::Result` so transport crates can
//! surface their own errors; the stage runner wraps them with the stage name.

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiChatModel, DEFAULT_OPENAI_ENDPOINT};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Models offered to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelChoice {
    /// GPT-3.5 Turbo.
    #[serde(rename = "gpt-3.5-turbo")]
    Gpt35Turbo,
    /// GPT-4.0.
    #[default]
    #[serde(rename = "gpt-4")]
    Gpt4,
    /// GPT-4.1.
    #[serde(rename = "gpt-4-turbo")]
    Gpt41,
    /// GPT-4.5.
    #[serde(rename = "gpt-4o")]
    Gpt45,
}

impl ModelChoice {
    /// Every choice, in menu order.
    pub const ALL: [Self; 4] = [Self::Gpt35Turbo, Self::Gpt4, Self::Gpt41, Self::Gpt45];

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gpt35Turbo => "GPT-3.5 Turbo",
            Self::Gpt4 => "GPT-4.0",
            Self::Gpt41 => "GPT-4.1",
            Self::Gpt45 => "GPT-4.5",
        }
    }

    /// Provider model id.
    #[must_use]
    pub fn model_id(self) -> &'static str {
        match self {
            Self::Gpt35Turbo => "gpt-3.5-turbo",
            Self::Gpt4 => "gpt-4",
            Self::Gpt41 => "gpt-4-turbo",
            Self::Gpt45 => "gpt-4o",
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelChoice {
    type Err = String;

    /// Accepts either the display label or the model id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s) || m.model_id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown model: {s}"))
    }
}

/// Per-call API credentials. Never serialized, redacted in debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    /// Wraps an API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }

    /// The raw key, for the transport only.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns true if no key was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.api_key.trim().is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[redacted]")
            .finish()
    }
}

/// One request to the language model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model to use.
    pub model: ModelChoice,
    /// System-level instructions for the agent role.
    pub instruction_profile: String,
    /// Shared context, e.g. truncated reference material.
    pub context: String,
    /// Stage prompt.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response length budget.
    pub max_tokens: u32,
    /// Caller credentials.
    pub credentials: Credentials,
}

impl CompletionRequest {
    /// The user message: context and prompt separated by a blank line.
    #[must_use]
    pub fn user_message(&self) -> String {
        if self.context.trim().is_empty() {
            self.prompt.clone()
        } else {
            format!("{}\n\n{}", self.context, self.prompt)
        }
    }
}

/// Produces text for a stage prompt.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Completes one request.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}
