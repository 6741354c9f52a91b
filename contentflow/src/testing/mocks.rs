//! Scripted language model.

use crate::providers::{CompletionRequest, LanguageModel};
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;

/// One scripted response.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// Return this text.
    Text(String),
    /// Fail with this message.
    Fail(String),
    /// Sleep, then return the text.
    Delayed(Duration, String),
}

/// A language model that replays replies in call order and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    /// Creates a model with an empty script; every call fails.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text reply.
    #[must_use]
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(ScriptedReply::Text(text.into()));
        self
    }

    /// Appends a failure.
    #[must_use]
    pub fn fail(self, message: impl Into<String>) -> Self {
        self.replies.lock().push_back(ScriptedReply::Fail(message.into()));
        self
    }

    /// Appends a reply that arrives after `delay`.
    #[must_use]
    pub fn delayed(self, delay: Duration, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .push_back(ScriptedReply::Delayed(delay, text.into()));
        self
    }

    /// Returns the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    /// Returns the prompt of every request received.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|r| r.prompt.clone()).collect()
    }

    /// Returns the number of replies not yet used.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        self.requests.lock().push(request.clone());
        let reply = self.replies.lock().pop_front();
        match reply {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(message)) => Err(anyhow!(message)),
            Some(ScriptedReply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Err(anyhow!("script exhausted")),
        }
    }
}
