//! Error types for the contentflow pipeline.
//!
//! Only collaborator failures are fatal to a run. Parse degradation is
//! resolved with defaults inside the parsers and a fan-out graph that cannot
//! reach its target size is returned as-is, so neither appears here.

use crate::core::StageName;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// The main error type for contentflow operations.
#[derive(Debug, Error)]
pub enum ContentflowError {
    /// The language-model collaborator failed.
    #[error("{0}")]
    Collaborator(#[from] CollaboratorError),

    /// A pipeline or revision request was rejected before any call was made.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ContentflowError {
    /// Creates an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Returns the stage this error is attributed to, if any.
    #[must_use]
    pub fn stage(&self) -> Option<StageName> {
        match self {
            Self::Collaborator(err) => err.stage,
            _ => None,
        }
    }
}

/// Error raised when an external language-model call fails or yields no
/// usable text.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{}", self.describe())]
pub struct CollaboratorError {
    /// The stage whose call failed, when the call belonged to a stage.
    pub stage: Option<StageName>,
    /// Description of the underlying failure.
    pub message: String,
    /// Whether the caller-supplied timeout elapsed.
    #[serde(default)]
    pub timed_out: bool,
}

impl CollaboratorError {
    fn describe(&self) -> String {
        match self.stage {
            Some(stage) => format!("Stage {stage} failed: {}", self.message),
            None => format!("Collaborator call failed: {}", self.message),
        }
    }

    /// Creates a collaborator error for a stage.
    #[must_use]
    pub fn new(stage: StageName, message: impl Into<String>) -> Self {
        Self {
            stage: Some(stage),
            message: message.into(),
            timed_out: false,
        }
    }

    /// Creates a collaborator error that is not tied to a pipeline stage.
    #[must_use]
    pub fn detached(message: impl Into<String>) -> Self {
        Self {
            stage: None,
            message: message.into(),
            timed_out: false,
        }
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(stage: Option<StageName>, seconds: f64) -> Self {
        Self {
            stage,
            message: format!("no response within {seconds}s"),
            timed_out: true,
        }
    }

    /// Creates the error raised when the collaborator returned blank text.
    #[must_use]
    pub fn empty_response(stage: Option<StageName>) -> Self {
        Self {
            stage,
            message: "returned no usable text".to_string(),
            timed_out: false,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("type".to_string(), serde_json::json!("CollaboratorError"));
        if let Some(stage) = self.stage {
            map.insert("stage".to_string(), serde_json::json!(stage.to_string()));
        }
        map.insert("reason".to_string(), serde_json::json!(self.message));
        map.insert("timed_out".to_string(), serde_json::json!(self.timed_out));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Result alias used across the crate.
pub type Result<T, E = ContentflowError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_error_display() {
        let err = CollaboratorError::new(StageName::Draft, "connection reset");
        assert_eq!(err.to_string(), "Stage draft failed: connection reset");

        let detached = CollaboratorError::detached("quota exceeded");
        assert!(detached.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_collaborator_error_to_dict() {
        let err = CollaboratorError::timeout(Some(StageName::FinalReview), 30.0);
        let dict = err.to_dict();

        assert_eq!(dict.get("type").unwrap(), "CollaboratorError");
        assert_eq!(dict.get("stage").unwrap(), "final_review");
        assert_eq!(dict.get("timed_out"), Some(&serde_json::json!(true)));
    }

    #[test]
    fn test_error_stage_attribution() {
        let err: ContentflowError =
            CollaboratorError::empty_response(Some(StageName::Strategy)).into();
        assert_eq!(err.stage(), Some(StageName::Strategy));
        assert_eq!(ContentflowError::invalid_request("blank").stage(), None);
    }
}
