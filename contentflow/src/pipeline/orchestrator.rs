//! Sequential stage orchestration.

use super::request::{PipelineMode, PipelineRequest};
use super::run::{FinalResult, PipelineRun, NOT_REVIEWED};
use crate::config::ContentflowConfig;
use crate::core::{StageName, StageOutput, StageStatus};
use crate::errors::{ContentflowError, Result};
use crate::events::RunObserver;
use crate::fanout::{GraphView, QueryFanoutBuilder};
use crate::parsing::{OutputParser, ParsedQuery, Verdict};
use crate::providers::{Credentials, LanguageModel};
use crate::stages::{expects_next_steps, prompts, StageCall, StageRunner};
use chrono::Utc;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

/// Drives the five stages in order and assembles the final result.
///
/// Stages run strictly one after another because each prompt is built from
/// earlier bodies. The first collaborator failure halts the run; stages
/// completed before it keep their output.
pub struct PipelineOrchestrator {
    runner: StageRunner,
    config: ContentflowConfig,
    fanout: QueryFanoutBuilder,
    observers: Vec<Arc<dyn RunObserver>>,
    next_version: AtomicU64,
}

impl fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("runner", &self.runner)
            .field("observers", &self.observers.len())
            .field("next_version", &self.next_version.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl PipelineOrchestrator {
    /// Creates an orchestrator whose first run is version 1.
    #[must_use]
    pub fn new(model: Arc<dyn LanguageModel>, config: ContentflowConfig) -> Self {
        Self {
            runner: StageRunner::new(model, &config),
            fanout: QueryFanoutBuilder::from_config(&config.fanout),
            config,
            observers: Vec::new(),
            next_version: AtomicU64::new(1),
        }
    }

    /// Replaces the output parser.
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn OutputParser>) -> Self {
        self.runner = self.runner.with_parser(parser);
        self
    }

    /// Adds an observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Continues numbering from an existing history.
    #[must_use]
    pub fn with_next_version(self, version: u64) -> Self {
        self.next_version.store(version.max(1), Ordering::SeqCst);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ContentflowConfig {
        &self.config
    }

    /// The stage runner, shared with the chat helper.
    #[must_use]
    pub fn runner(&self) -> &StageRunner {
        &self.runner
    }

    fn take_version(&self) -> u64 {
        self.next_version.fetch_add(1, Ordering::SeqCst)
    }

    fn notify(&self, run: &PipelineRun) {
        for observer in &self.observers {
            observer.on_transition(run);
        }
    }

    fn advance(&self, run: &mut PipelineRun, stage: StageName, status: StageStatus) {
        let moved = run
            .stage_mut(stage)
            .is_some_and(|record| record.advance(status));
        if !moved {
            warn!(stage = %stage, status = %status, "ignored backward stage transition");
        }
    }

    /// Runs every stage the request's mode includes.
    ///
    /// Returns `Err` only for an invalid request. A collaborator failure
    /// yields `Ok` with the run's `error` set and the failing stage marked
    /// `Failed`; check [`PipelineRun::is_successful`].
    pub async fn run(
        &self,
        request: PipelineRequest,
        credentials: &Credentials,
    ) -> Result<PipelineRun> {
        request.validate()?;
        let version = self.take_version();
        let span = info_span!(
            "pipeline_run",
            version,
            mode = %request.mode,
            fingerprint = %request.fingerprint(),
        );
        Ok(self
            .execute(PipelineRun::new(version, request), credentials)
            .instrument(span)
            .await)
    }

    async fn execute(&self, mut run: PipelineRun, credentials: &Credentials) -> PipelineRun {
        let mode = run.request.mode;
        for record in &mut run.stages {
            let status = if mode.skips(record.name) {
                StageStatus::Skipped
            } else {
                StageStatus::Queued
            };
            record.advance(status);
        }
        info!(stages = %run.status_summary(), "pipeline run started");
        self.notify(&run);

        let context = prompts::shared_context(
            &run.request.references,
            self.config.reference_budget_chars,
        );
        let topic = run.request.topic.clone();
        let mut verdict = None;

        for stage in mode.active_stages() {
            let prompt = Self::prompt_for(stage, &run);
            self.advance(&mut run, stage, StageStatus::InProgress);
            self.notify(&run);

            let call = StageCall::new(stage, &prompt)
                .with_context(&context)
                .with_topic(&topic);
            match self.runner.run(call, credentials).await {
                Ok(output) => {
                    verdict = output.verdict.clone().or(verdict);
                    Self::fold_output(&mut run, output);
                    self.advance(&mut run, stage, StageStatus::Completed);
                    info!(stage = %stage, progress = run.progress(), "stage completed");
                    self.notify(&run);
                }
                Err(err) => {
                    if let Some(record) = run.stage_mut(stage) {
                        record.error = Some(err.to_string());
                    }
                    self.advance(&mut run, stage, StageStatus::Failed);
                    warn!(stage = %stage, error = %err, "stage failed, halting run");
                    run.error = Some(err);
                    run.finished_at = Some(Utc::now());
                    self.notify(&run);
                    return run;
                }
            }
        }

        run.result = Some(self.assemble(&run, verdict));
        run.finished_at = Some(Utc::now());
        info!(progress = run.progress(), "pipeline run finished");
        self.notify(&run);
        run
    }

    /// Applies `feedback` to the final body of `prior` with one reviewer call.
    ///
    /// The prior run is left untouched; the returned run has a new version,
    /// a single final-review stage record and `revision_of` set.
    pub async fn revise(
        &self,
        prior: &PipelineRun,
        feedback: &str,
        credentials: &Credentials,
    ) -> Result<PipelineRun> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(ContentflowError::invalid_request("feedback must not be blank"));
        }
        let prior_result = prior.result.as_ref().ok_or_else(|| {
            ContentflowError::invalid_request(format!(
                "run {} has no final result to revise",
                prior.version
            ))
        })?;

        let version = self.take_version();
        let span = info_span!("pipeline_revision", version, revises = prior.version);
        async {
            let stage = StageName::FinalReview;
            let mut run = PipelineRun::revision_of(version, prior, feedback);
            self.advance(&mut run, stage, StageStatus::Queued);
            self.notify(&run);
            self.advance(&mut run, stage, StageStatus::InProgress);
            self.notify(&run);

            match self
                .runner
                .run_revision(&prior_result.body, feedback, credentials)
                .await
            {
                Ok(revision) => {
                    if let Some(record) = run.stage_mut(stage) {
                        record.output = Some(revision.body.clone());
                    }
                    self.advance(&mut run, stage, StageStatus::Completed);
                    run.result = Some(FinalResult {
                        body: revision.body,
                        approval: revision.approval,
                        score: revision.score,
                        ..prior_result.clone()
                    });
                    info!(progress = run.progress(), "revision finished");
                }
                Err(err) => {
                    if let Some(record) = run.stage_mut(stage) {
                        record.error = Some(err.to_string());
                    }
                    self.advance(&mut run, stage, StageStatus::Failed);
                    warn!(error = %err, "revision failed");
                    run.error = Some(err);
                }
            }
            run.finished_at = Some(Utc::now());
            self.notify(&run);
            Ok::<_, ContentflowError>(run)
        }
        .instrument(span)
        .await
    }

    /// Builds the fan-out graph view for a title and its queries.
    #[must_use]
    pub fn build_graph(&self, title: &str, queries: &[ParsedQuery]) -> GraphView {
        let seeds: Vec<&str> = queries.iter().map(|q| q.query.as_str()).collect();
        self.fanout
            .build_with(title, &seeds, &self.config.fanout)
            .to_view()
    }

    fn prompt_for(stage: StageName, run: &PipelineRun) -> String {
        let request = &run.request;
        let body = |name| run.body_of(name).unwrap_or_default();
        match stage {
            StageName::Strategy => prompts::strategy_prompt(request),
            StageName::SearchAnalysis => {
                prompts::search_analysis_prompt(request, body(StageName::Strategy))
            }
            StageName::Draft => {
                prompts::draft_prompt(request, body(StageName::Strategy), &run.queries)
            }
            StageName::BrandRefinement => {
                let content = match request.mode {
                    PipelineMode::Full => body(StageName::Draft).to_string(),
                    PipelineMode::Plan => prompts::plan_material(
                        body(StageName::Strategy),
                        body(StageName::SearchAnalysis),
                    ),
                };
                prompts::brand_refinement_prompt(request, &content)
            }
            StageName::FinalReview => {
                prompts::final_review_prompt(request, body(StageName::BrandRefinement))
            }
        }
    }

    fn fold_output(run: &mut PipelineRun, output: StageOutput) {
        let stage = output.stage;
        if !output.queries.is_empty() {
            run.queries = output.queries;
        }
        if let Some(record) = run.stage_mut(stage) {
            record.output = Some(output.body);
            if expects_next_steps(stage) {
                record.next_steps = Some(output.next_steps);
            }
        }
    }

    fn assemble(&self, run: &PipelineRun, verdict: Option<Verdict>) -> FinalResult {
        let body = run
            .body_of(StageName::BrandRefinement)
            .unwrap_or_default()
            .to_string();

        let (title, approval, score, comments) = match verdict {
            Some(v) => (v.final_title, v.approval, v.score, v.comments),
            None => (
                run.request.topic.clone(),
                NOT_REVIEWED.to_string(),
                String::new(),
                String::new(),
            ),
        };

        let next_steps: BTreeMap<StageName, Vec<String>> = run
            .stages
            .iter()
            .filter_map(|s| s.next_steps.clone().map(|steps| (s.name, steps)))
            .collect();

        let graph = self.build_graph(&title, &run.queries);

        FinalResult {
            title,
            body,
            approval,
            score,
            comments,
            next_steps,
            queries: run.queries.clone(),
            graph: Some(graph),
        }
    }
}
