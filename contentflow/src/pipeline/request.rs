//! Pipeline input parameters.

use crate::core::StageName;
use crate::errors::{ContentflowError, Result};
use crate::helpers::non_blank_or;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Voice used when the request does not override it.
pub const DEFAULT_BRAND_VOICE: &str = "Professional, data-driven, friendly";

/// Content types offered by the request form.
pub const CONTENT_TYPES: [&str; 6] = [
    "Blog Post",
    "Social Media Caption",
    "Email Newsletter",
    "Press Release",
    "Product Description",
    "Landing Page Copy",
];

/// Full production or a strategy-only plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    /// All five stages.
    #[default]
    Full,
    /// Skips drafting and final review.
    Plan,
}

impl PipelineMode {
    /// Returns true if this mode leaves `stage` out.
    #[must_use]
    pub fn skips(self, stage: StageName) -> bool {
        self == Self::Plan && stage.skipped_in_plan_mode()
    }

    /// Stages this mode runs, in order.
    #[must_use]
    pub fn active_stages(self) -> Vec<StageName> {
        StageName::ALL.into_iter().filter(|s| !self.skips(*s)).collect()
    }

    /// The stage whose completion ends the run.
    #[must_use]
    pub fn last_stage(self) -> StageName {
        match self {
            Self::Full => StageName::FinalReview,
            Self::Plan => StageName::BrandRefinement,
        }
    }
}

impl fmt::Display for PipelineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Plan => write!(f, "plan"),
        }
    }
}

fn default_content_type() -> String {
    CONTENT_TYPES[0].to_string()
}

/// What to produce and for whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    /// Kind of piece, e.g. "Blog Post".
    #[serde(default = "default_content_type")]
    pub content_type: String,
    /// Topic or working title.
    pub topic: String,
    /// Target audience.
    #[serde(default)]
    pub audience: String,
    /// Length guidance, e.g. "Medium (600-800 words)".
    #[serde(default)]
    pub length: String,
    /// Points the piece must carry.
    #[serde(default)]
    pub key_messages: String,
    /// Brand voice override; blank means [`DEFAULT_BRAND_VOICE`].
    #[serde(default)]
    pub brand_voice: String,
    /// Comma-separated SEO keywords.
    #[serde(default)]
    pub keywords: String,
    /// Compliance constraints.
    #[serde(default)]
    pub compliance: String,
    /// Concatenated reference material.
    #[serde(default)]
    pub references: String,
    /// Full or plan mode.
    #[serde(default)]
    pub mode: PipelineMode,
}

impl PipelineRequest {
    /// Creates a full-mode request for `topic`.
    #[must_use]
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            content_type: default_content_type(),
            topic: topic.into(),
            audience: String::new(),
            length: String::new(),
            key_messages: String::new(),
            brand_voice: String::new(),
            keywords: String::new(),
            compliance: String::new(),
            references: String::new(),
            mode: PipelineMode::Full,
        }
    }

    /// Sets the content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// Sets the length guidance.
    #[must_use]
    pub fn with_length(mut self, length: impl Into<String>) -> Self {
        self.length = length.into();
        self
    }

    /// Sets the key messages.
    #[must_use]
    pub fn with_key_messages(mut self, key_messages: impl Into<String>) -> Self {
        self.key_messages = key_messages.into();
        self
    }

    /// Sets the brand voice override.
    #[must_use]
    pub fn with_brand_voice(mut self, voice: impl Into<String>) -> Self {
        self.brand_voice = voice.into();
        self
    }

    /// Sets the keywords.
    #[must_use]
    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = keywords.into();
        self
    }

    /// Sets the compliance constraints.
    #[must_use]
    pub fn with_compliance(mut self, compliance: impl Into<String>) -> Self {
        self.compliance = compliance.into();
        self
    }

    /// Replaces the reference material.
    #[must_use]
    pub fn with_references(mut self, references: impl Into<String>) -> Self {
        self.references = references.into();
        self
    }

    /// Sets the mode.
    #[must_use]
    pub fn with_mode(mut self, mode: PipelineMode) -> Self {
        self.mode = mode;
        self
    }

    /// Appends one named reference document under a `--- name ---` divider.
    pub fn add_reference(&mut self, name: &str, text: &str) {
        self.references.push_str(&format!("\n\n--- {name} ---\n{text}"));
    }

    /// The brand voice with the default applied.
    #[must_use]
    pub fn effective_brand_voice(&self) -> &str {
        non_blank_or(&self.brand_voice, DEFAULT_BRAND_VOICE)
    }

    /// Rejects requests that cannot start a run.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(ContentflowError::invalid_request("topic must not be blank"));
        }
        Ok(())
    }

    /// Short stable hash of the request, for log correlation.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let encoded = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&encoded);
        hex::encode(&digest[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_stage_sets() {
        assert_eq!(PipelineMode::Full.active_stages(), StageName::ALL.to_vec());
        assert_eq!(
            PipelineMode::Plan.active_stages(),
            vec![
                StageName::Strategy,
                StageName::SearchAnalysis,
                StageName::BrandRefinement
            ]
        );
        assert_eq!(PipelineMode::Plan.last_stage(), StageName::BrandRefinement);
        assert!(!PipelineMode::Full.skips(StageName::Draft));
    }

    #[test]
    fn test_validate() {
        assert!(PipelineRequest::new("Sustainable packaging").validate().is_ok());
        let err = PipelineRequest::new("   ").validate().unwrap_err();
        assert!(matches!(err, ContentflowError::InvalidRequest(_)));
    }

    #[test]
    fn test_brand_voice_default() {
        let request = PipelineRequest::new("t");
        assert_eq!(request.effective_brand_voice(), DEFAULT_BRAND_VOICE);
        let request = request.with_brand_voice("Casual and humorous");
        assert_eq!(request.effective_brand_voice(), "Casual and humorous");
    }

    #[test]
    fn test_add_reference() {
        let mut request = PipelineRequest::new("t");
        request.add_reference("notes.txt", "Recycled board is cheaper.");
        assert_eq!(request.references, "\n\n--- notes.txt ---\nRecycled board is cheaper.");
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = PipelineRequest::new("t").with_keywords("eco");
        let b = PipelineRequest::new("t").with_keywords("eco");
        let c = PipelineRequest::new("t").with_keywords("green");
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
    }

    #[test]
    fn test_deserialize_minimal() {
        let request: PipelineRequest = serde_json::from_str(r#"{"topic": "t", "mode": "plan"}"#).unwrap();
        assert_eq!(request.content_type, "Blog Post");
        assert_eq!(request.mode, PipelineMode::Plan);
    }
}
