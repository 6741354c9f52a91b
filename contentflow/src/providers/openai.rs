//! OpenAI-compatible chat-completions client.

use super::{CompletionRequest, LanguageModel};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Public OpenAI API base URL.
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// Calls `{endpoint}/chat/completions` with the request's credentials.
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: Client,
    endpoint: String,
}

impl OpenAiChatModel {
    /// Creates a client against the public endpoint.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_endpoint(DEFAULT_OPENAI_ENDPOINT)
    }

    /// Creates a client against a compatible endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

fn build_body(request: &CompletionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: request.model.model_id(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: request.instruction_profile.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: request.user_message(),
            },
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

#[async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        if request.credentials.is_empty() {
            return Err(anyhow!("missing API key"));
        }

        let started = Instant::now();
        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .bearer_auth(request.credentials.api_key())
            .json(&build_body(request))
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, model = request.model.model_id(), "chat completion rejected");
            return Err(anyhow!("provider returned {status}: {detail}"));
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("malformed chat completion response")?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("provider returned no choices"))?;

        debug!(
            model = request.model.model_id(),
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            chars = content.len(),
            "chat completion received"
        );
        Ok(content)
    }
}
