//! Single-stage execution against the language-model collaborator.
//!
//! A [`StageRunner`] makes exactly one collaborator call per invocation and
//! routes the response through the [`OutputParser`] extractions that match
//! the stage. It never retries; failures go back to the orchestrator.

pub mod profiles;
pub mod prompts;

pub use profiles::{expects_next_steps, expects_queries, expects_verdict, instruction_profile};

use crate::config::ContentflowConfig;
use crate::core::{StageName, StageOutput};
use crate::errors::CollaboratorError;
use crate::helpers::{run_with_optional_timeout, TimedResult};
use crate::parsing::{HeadingOutputParser, OutputParser, Revision};
use crate::providers::{CompletionRequest, Credentials, LanguageModel, ModelChoice};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// One stage invocation.
#[derive(Debug, Clone, Copy)]
pub struct StageCall<'a> {
    /// Stage to run.
    pub stage: StageName,
    /// Stage prompt.
    pub prompt: &'a str,
    /// Shared context, e.g. truncated references.
    pub context: &'a str,
    /// Topic, used as the default title of a verdict.
    pub topic: &'a str,
}

impl<'a> StageCall<'a> {
    /// Creates a call with no shared context.
    #[must_use]
    pub fn new(stage: StageName, prompt: &'a str) -> Self {
        Self {
            stage,
            prompt,
            context: "",
            topic: "",
        }
    }

    /// Sets the shared context.
    #[must_use]
    pub fn with_context(mut self, context: &'a str) -> Self {
        self.context = context;
        self
    }

    /// Sets the topic.
    #[must_use]
    pub fn with_topic(mut self, topic: &'a str) -> Self {
        self.topic = topic;
        self
    }
}

/// Calls the collaborator for one stage and parses the response.
#[derive(Clone)]
pub struct StageRunner {
    model: Arc<dyn LanguageModel>,
    parser: Arc<dyn OutputParser>,
    choice: ModelChoice,
    temperature: f32,
    max_tokens: u32,
    timeout: Option<Duration>,
}

impl fmt::Debug for StageRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRunner")
            .field("parser", &self.parser)
            .field("model", &self.choice)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl StageRunner {
    /// Creates a runner with the heading parser.
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, config: &ContentflowConfig) -> Self {
        Self {
            model,
            parser: Arc::new(HeadingOutputParser),
            choice: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            timeout: config.stage_timeout(),
        }
    }

    /// Replaces the output parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn OutputParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Returns the parser in use.
    #[must_use]
    pub fn parser(&self) -> &dyn OutputParser {
        self.parser.as_ref()
    }

    /// Runs one stage.
    pub async fn run(
        &self,
        call: StageCall<'_>,
        credentials: &Credentials,
    ) -> Result<StageOutput, CollaboratorError> {
        let stage = call.stage;
        let raw = self
            .complete(
                Some(stage),
                instruction_profile(stage),
                call.context,
                call.prompt,
                credentials,
            )
            .await?;
        Ok(self.parse(stage, raw, call.topic))
    }

    /// Asks the reviewer profile to apply `feedback` to `body`.
    pub async fn run_revision(
        &self,
        body: &str,
        feedback: &str,
        credentials: &Credentials,
    ) -> Result<Revision, CollaboratorError> {
        let prompt = prompts::revision_prompt(body, feedback);
        let raw = self
            .complete(
                Some(StageName::FinalReview),
                instruction_profile(StageName::FinalReview),
                "",
                &prompt,
                credentials,
            )
            .await?;
        Ok(self.parser.extract_revision(&raw))
    }

    /// Makes one raw collaborator call with the given profile.
    ///
    /// Errors are attributed to `stage` when given. Blank responses are
    /// errors.
    pub async fn complete(
        &self,
        stage: Option<StageName>,
        instruction_profile: String,
        context: &str,
        prompt: &str,
        credentials: &Credentials,
    ) -> Result<String, CollaboratorError> {
        let request = CompletionRequest {
            model: self.choice,
            instruction_profile,
            context: context.to_string(),
            prompt: prompt.to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            credentials: credentials.clone(),
        };

        let started = Instant::now();
        let stage_label = stage.map_or_else(|| "-".to_string(), |s| s.to_string());
        info!(stage = %stage_label, model = self.choice.model_id(), "collaborator call started");

        let outcome = run_with_optional_timeout(self.timeout, self.model.complete(&request)).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let text = match outcome {
            TimedResult::Ok(text) => text,
            TimedResult::Err(err) => {
                let message = format!("{err:#}");
                warn!(stage = %stage_label, duration_ms, error = %message, "collaborator call failed");
                return Err(match stage {
                    Some(stage) => CollaboratorError::new(stage, message),
                    None => CollaboratorError::detached(message),
                });
            }
            TimedResult::Timeout => {
                let seconds = self.timeout.map_or(0.0, |t| t.as_secs_f64());
                warn!(stage = %stage_label, duration_ms, "collaborator call timed out");
                return Err(CollaboratorError::timeout(stage, seconds));
            }
        };

        if text.trim().is_empty() {
            warn!(stage = %stage_label, duration_ms, "collaborator returned blank text");
            return Err(CollaboratorError::empty_response(stage));
        }

        info!(stage = %stage_label, duration_ms, chars = text.len(), "collaborator call finished");
        Ok(text)
    }

    fn parse(&self, stage: StageName, raw: String, topic: &str) -> StageOutput {
        let mut output = StageOutput::new(stage, raw);

        if expects_next_steps(stage) {
            let split = self.parser.split_next_steps(&output.raw);
            if split.next_steps.is_empty() {
                debug!(stage = %stage, "no next steps found");
            }
            output = output.with_split(split.body, split.next_steps);
        }

        if expects_queries(stage) {
            let queries = self.parser.extract_queries(&output.raw);
            if queries.is_empty() {
                warn!(stage = %stage, "no search queries found");
            } else {
                debug!(stage = %stage, count = queries.len(), "search queries extracted");
            }
            output = output.with_queries(queries);
        }

        if expects_verdict(stage) {
            let verdict = self.parser.extract_verdict(&output.raw, topic);
            if verdict.defaults_applied {
                debug!(stage = %stage, "default verdict fields applied");
            }
            output = output.with_verdict(verdict);
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::MockLanguageModel;
    use pretty_assertions::assert_eq;

    fn runner(model: MockLanguageModel) -> StageRunner {
        StageRunner::new(Arc::new(model), &ContentflowConfig::default())
    }

    fn replying(text: &'static str) -> MockLanguageModel {
        let mut model = MockLanguageModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(move |_| Ok(text.to_string()));
        model
    }

    #[tokio::test]
    async fn test_search_analysis_routes_queries_and_next_steps() {
        let text = "Analysis.\n\nSearch Queries:\n- Comparative: a vs b - note\n- Implicit: c\n\n### Next Steps\n- Use the queries";
        let output = runner(replying(text))
            .run(StageCall::new(StageName::SearchAnalysis, "p"), &Credentials::new("k"))
            .await
            .unwrap();
        assert_eq!(output.queries.len(), 2);
        assert_eq!(output.queries[0].note, "note");
        assert_eq!(output.next_steps, vec!["Use the queries".to_string()]);
        assert!(!output.body.contains("Next Steps"));
        assert!(output.verdict.is_none());
    }

    #[tokio::test]
    async fn test_final_review_parses_verdict_only() {
        let text = "Good.\nAPPROVAL: Approved\nSCORE: 9/10\n### Next Steps\n- ignored";
        let output = runner(replying(text))
            .run(
                StageCall::new(StageName::FinalReview, "p").with_topic("Topic"),
                &Credentials::new("k"),
            )
            .await
            .unwrap();
        let verdict = output.verdict.unwrap();
        assert_eq!(verdict.score, "9/10");
        assert_eq!(verdict.final_title, "Topic");
        assert!(output.next_steps.is_empty());
        assert_eq!(output.body, text);
    }

    #[tokio::test]
    async fn test_request_carries_profile_context_and_settings() {
        let mut model = MockLanguageModel::new();
        model
            .expect_complete()
            .withf(|req| {
                req.instruction_profile.contains("Content Strategist")
                    && req.context == "ctx"
                    && req.prompt == "plan"
                    && req.max_tokens == 2000
                    && req.model == ModelChoice::Gpt4
            })
            .times(1)
            .returning(|_| Ok("Plan".to_string()));
        let output = runner(model)
            .run(
                StageCall::new(StageName::Strategy, "plan").with_context("ctx"),
                &Credentials::new("k"),
            )
            .await
            .unwrap();
        assert_eq!(output.body, "Plan");
    }

    #[tokio::test]
    async fn test_provider_error_carries_stage() {
        let mut model = MockLanguageModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("connection reset")));
        let err = runner(model)
            .run(StageCall::new(StageName::Draft, "p"), &Credentials::new("k"))
            .await
            .unwrap_err();
        assert_eq!(err.stage, Some(StageName::Draft));
        assert!(err.message.contains("connection reset"));
        assert!(!err.timed_out);
    }

    #[tokio::test]
    async fn test_blank_response_is_an_error() {
        let err = runner(replying("  \n "))
            .run(StageCall::new(StageName::Strategy, "p"), &Credentials::new("k"))
            .await
            .unwrap_err();
        assert_eq!(err, CollaboratorError::empty_response(Some(StageName::Strategy)));
    }

    #[tokio::test]
    async fn test_revision_parsing() {
        let revision = runner(replying("New body\nAPPROVAL: Approved\nSCORE: 10/10"))
            .run_revision("Old", "Shorter", &Credentials::new("k"))
            .await
            .unwrap();
        assert_eq!(revision.body, "New body");
        assert_eq!(revision.score, "10/10");
    }
}
