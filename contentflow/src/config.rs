//! Pipeline configuration.

use crate::errors::{ContentflowError, Result};
use crate::fanout::FanoutConfig;
use crate::providers::ModelChoice;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by the runner, the orchestrator and the chat helper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentflowConfig {
    /// Model used for every stage.
    #[serde(default)]
    pub model: ModelChoice,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Response length budget per call.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Characters of reference text passed to the agents.
    #[serde(default = "default_preview_chars")]
    pub reference_budget_chars: usize,
    /// Characters of the current body shown to a chat agent.
    #[serde(default = "default_preview_chars")]
    pub chat_preview_chars: usize,
    /// Timeout per collaborator call, unbounded when absent.
    #[serde(default)]
    pub stage_timeout_seconds: Option<f64>,
    /// Fan-out graph limits.
    #[serde(default)]
    pub fanout: FanoutConfig,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_preview_chars() -> usize {
    500
}

impl Default for ContentflowConfig {
    fn default() -> Self {
        Self {
            model: ModelChoice::default(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            reference_budget_chars: default_preview_chars(),
            chat_preview_chars: default_preview_chars(),
            stage_timeout_seconds: None,
            fanout: FanoutConfig::default(),
        }
    }
}

impl ContentflowConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ContentflowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no call could honour.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ContentflowError::Config(format!(
                "temperature must be within 0..=2, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(ContentflowError::Config("max_tokens must be positive".to_string()));
        }
        if let Some(seconds) = self.stage_timeout_seconds {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(ContentflowError::Config(format!(
                    "stage_timeout_seconds must be positive, got {seconds}"
                )));
            }
            if Duration::try_from_secs_f64(seconds).is_err() {
                return Err(ContentflowError::Config(format!(
                    "stage_timeout_seconds is out of range, got {seconds}"
                )));
            }
        }
        Ok(())
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: ModelChoice) -> Self {
        self.model = model;
        self
    }

    /// Sets the temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the token budget.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the reference truncation budget.
    #[must_use]
    pub fn with_reference_budget(mut self, chars: usize) -> Self {
        self.reference_budget_chars = chars;
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_stage_timeout(mut self, seconds: f64) -> Self {
        self.stage_timeout_seconds = Some(seconds);
        self
    }

    /// Sets the fan-out limits.
    #[must_use]
    pub fn with_fanout(mut self, fanout: FanoutConfig) -> Self {
        self.fanout = fanout;
        self
    }

    /// Gets the per-call timeout as a Duration. Values that are not a
    /// representable positive duration leave calls unbounded.
    #[must_use]
    pub fn stage_timeout(&self) -> Option<Duration> {
        self.stage_timeout_seconds
            .filter(|s| *s > 0.0)
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ContentflowConfig::default();
        assert_eq!(config.model, ModelChoice::Gpt4);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 2000);
        assert_eq!(config.reference_budget_chars, 500);
        assert!(config.stage_timeout().is_none());
    }

    #[test]
    fn test_partial_json() {
        let config = ContentflowConfig::from_json_str(
            r#"{"model": "gpt-4o", "stage_timeout_seconds": 1.5, "fanout": {"minimum_node_count": 8}}"#,
        )
        .unwrap();
        assert_eq!(config.model, ModelChoice::Gpt45);
        assert_eq!(config.stage_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.fanout.minimum_node_count, 8);
        assert_eq!(config.fanout.max_levels, 2);
        assert_eq!(config.max_tokens, 2000);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = ContentflowConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ContentflowError::Config(_)));

        let err = ContentflowConfig::from_json_str(r#"{"max_tokens": 0}"#).unwrap_err();
        assert!(err.to_string().contains("max_tokens"));
    }

    #[test]
    fn test_out_of_range_timeout() {
        let err = ContentflowConfig::from_json_str(r#"{"stage_timeout_seconds": 1e30}"#).unwrap_err();
        assert!(matches!(err, ContentflowError::Config(_)));
        assert!(err.to_string().contains("out of range"));

        let config = ContentflowConfig::new().with_stage_timeout(1e30);
        assert!(config.validate().is_err());
        assert_eq!(config.stage_timeout(), None);
    }

    #[test]
    fn test_builder() {
        let config = ContentflowConfig::new()
            .with_model(ModelChoice::Gpt35Turbo)
            .with_stage_timeout(30.0)
            .with_reference_budget(100);
        assert_eq!(config.model, ModelChoice::Gpt35Turbo);
        assert_eq!(config.stage_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.reference_budget_chars, 100);
    }
}
