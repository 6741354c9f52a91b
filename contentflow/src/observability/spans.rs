//! Span attribute maps for runs and stages.
//!
//! These render the state recorded on a [`PipelineRun`] as flat string maps
//! so an observer can forward them to an OpenTelemetry exporter without
//! knowing the run layout.

use crate::core::StageRecord;
use crate::pipeline::PipelineRun;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Span attributes for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSpanAttributes {
    /// Run id.
    pub run_id: String,
    /// Version number.
    pub version: u64,
    /// Pipeline mode.
    pub mode: String,
    /// Request fingerprint.
    pub fingerprint: String,
    /// Version this run revises.
    pub revision_of: Option<u64>,
    /// Progress at the time of capture.
    pub progress: f64,
    /// Error text if the run halted.
    pub error: Option<String>,
}

impl RunSpanAttributes {
    /// Captures the attributes of a run.
    #[must_use]
    pub fn from_run(run: &PipelineRun) -> Self {
        Self {
            run_id: run.run_id.to_string(),
            version: run.version,
            mode: run.request.mode.to_string(),
            fingerprint: run.request.fingerprint(),
            revision_of: run.revision_of,
            progress: run.progress(),
            error: run.error.as_ref().map(ToString::to_string),
        }
    }

    /// Converts to OpenTelemetry attributes.
    #[must_use]
    pub fn to_otel_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        attrs.insert("pipeline.run_id".to_string(), self.run_id.clone());
        attrs.insert("pipeline.version".to_string(), self.version.to_string());
        attrs.insert("pipeline.mode".to_string(), self.mode.clone());
        attrs.insert("pipeline.fingerprint".to_string(), self.fingerprint.clone());
        attrs.insert("pipeline.progress".to_string(), format!("{:.2}", self.progress));
        if let Some(v) = self.revision_of {
            attrs.insert("pipeline.revision_of".to_string(), v.to_string());
        }
        if let Some(ref v) = self.error {
            attrs.insert("pipeline.error".to_string(), v.clone());
        }
        attrs
    }
}

/// Span attributes for stage execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageSpanAttributes {
    /// Stage name.
    pub stage_name: String,
    /// Stage status.
    pub status: Option<String>,
    /// Duration in milliseconds.
    pub duration_ms: Option<f64>,
    /// Error message if failed.
    pub error: Option<String>,
    /// Number of next-step suggestions.
    pub next_step_count: Option<usize>,
}

impl StageSpanAttributes {
    /// Creates new stage span attributes.
    #[must_use]
    pub fn new(stage_name: impl Into<String>) -> Self {
        Self {
            stage_name: stage_name.into(),
            ..Default::default()
        }
    }

    /// Captures the attributes of a stage record.
    #[must_use]
    pub fn from_record(record: &StageRecord) -> Self {
        let mut attrs = Self::new(record.name.to_string()).with_status(record.status.to_string());
        if let Some(ms) = record.duration_ms() {
            #[allow(clippy::cast_precision_loss)]
            let ms = ms as f64;
            attrs = attrs.with_duration_ms(ms);
        }
        if let Some(ref error) = record.error {
            attrs = attrs.with_error(error.clone());
        }
        attrs.next_step_count = record.next_steps.as_ref().map(Vec::len);
        attrs
    }

    /// Captures every stage of a run, in execution order.
    #[must_use]
    pub fn for_run(run: &PipelineRun) -> Vec<Self> {
        run.stages.iter().map(Self::from_record).collect()
    }

    /// Sets the stage status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Sets the error.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Converts to OpenTelemetry attributes.
    #[must_use]
    pub fn to_otel_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        attrs.insert("stage.name".to_string(), self.stage_name.clone());
        if let Some(ref v) = self.status {
            attrs.insert("stage.status".to_string(), v.clone());
        }
        if let Some(v) = self.duration_ms {
            attrs.insert("stage.duration_ms".to_string(), v.to_string());
        }
        if let Some(ref v) = self.error {
            attrs.insert("stage.error".to_string(), v.clone());
        }
        if let Some(v) = self.next_step_count {
            attrs.insert("stage.next_steps".to_string(), v.to_string());
        }
        attrs
    }
}
