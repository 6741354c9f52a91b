//! Stage prompts built from the request and earlier stage bodies.

use crate::helpers::truncate_with_ellipsis;
use crate::parsing::ParsedQuery;
use crate::pipeline::PipelineRequest;

/// Shared context sent with every stage call: the reference material cut to
/// `budget` characters. Empty when there is no reference text.
#[must_use]
pub fn shared_context(references: &str, budget: usize) -> String {
    let references = references.trim();
    if references.is_empty() {
        return String::new();
    }
    format!(
        "Reference Materials:\n{}",
        truncate_with_ellipsis(references, budget)
    )
}

/// Strategy prompt.
#[must_use]
pub fn strategy_prompt(request: &PipelineRequest) -> String {
    format!(
        "Content Type: {}\nTopic: {}\nTarget Audience: {}\nLength: {}\nKey Messages: {}\nBrand Voice: {}\n\nCreate a comprehensive content strategy with outline.",
        request.content_type,
        request.topic,
        request.audience,
        request.length,
        request.key_messages,
        request.effective_brand_voice(),
    )
}

/// Search-analysis prompt.
#[must_use]
pub fn search_analysis_prompt(request: &PipelineRequest, strategy: &str) -> String {
    format!(
        "Analyse search intent for this {} about {}.\nKeywords to target: {}\n\nStrategy:\n{strategy}\n\nList the search queries this piece should answer.",
        request.content_type, request.topic, request.keywords,
    )
}

/// Draft prompt.
#[must_use]
pub fn draft_prompt(request: &PipelineRequest, strategy: &str, queries: &[ParsedQuery]) -> String {
    let query_list = if queries.is_empty() {
        "(none)".to_string()
    } else {
        queries
            .iter()
            .map(|q| format!("- {}", q.query))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "Based on this strategy:\n{strategy}\n\nWrite the full content for a {} about {}.\nTarget audience: {}\nLength: {}\nKey messages to include: {}\nVoice: {}\n\nSearch queries to answer:\n{query_list}",
        request.content_type,
        request.topic,
        request.audience,
        request.length,
        request.key_messages,
        request.effective_brand_voice(),
    )
}

/// Brand-refinement prompt. `content` is the draft, or in plan mode the
/// strategy and search analysis.
#[must_use]
pub fn brand_refinement_prompt(request: &PipelineRequest, content: &str) -> String {
    format!(
        "Refine this content for brand alignment and compliance.\nBrand voice: {}\nCompliance requirements: {}\n\nContent to refine:\n{content}\n\nReturn the full refined content.",
        request.effective_brand_voice(),
        request.compliance,
    )
}

/// Plan-mode input for brand refinement.
#[must_use]
pub fn plan_material(strategy: &str, search_analysis: &str) -> String {
    format!("Strategy:\n{strategy}\n\nSearch analysis:\n{search_analysis}")
}

/// Final-review prompt.
#[must_use]
pub fn final_review_prompt(request: &PipelineRequest, content: &str) -> String {
    format!(
        "Review this final content for approval.\nOriginal topic: {}\nContent type: {}\n\nContent to review:\n{content}",
        request.topic, request.content_type,
    )
}

/// Revision prompt for the reviewer profile.
#[must_use]
pub fn revision_prompt(body: &str, feedback: &str) -> String {
    format!(
        "Apply the following user feedback to revise this content:\n\nFeedback: {feedback}\n\nCurrent content:\n{body}\n\nProvide the full revised content and then add:\nAPPROVAL: [Approved/Needs Revision]\nSCORE: [X/10]"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DEFAULT_BRAND_VOICE;

    #[test]
    fn test_shared_context_truncates() {
        assert_eq!(shared_context("  ", 500), "");
        let context = shared_context(&"r".repeat(600), 500);
        assert!(context.starts_with("Reference Materials:\n"));
        assert!(context.ends_with("..."));
        assert_eq!(context.chars().count(), "Reference Materials:\n".len() + 503);
    }

    #[test]
    fn test_strategy_prompt_uses_default_voice() {
        let prompt = strategy_prompt(&PipelineRequest::new("Green Packaging"));
        assert!(prompt.contains("Topic: Green Packaging"));
        assert!(prompt.contains(DEFAULT_BRAND_VOICE));
    }

    #[test]
    fn test_draft_prompt_lists_queries() {
        let request = PipelineRequest::new("t");
        let queries = vec![ParsedQuery::new("what is t"), ParsedQuery::new("t vs u")];
        let prompt = draft_prompt(&request, "the plan", &queries);
        assert!(prompt.contains("the plan"));
        assert!(prompt.contains("- what is t\n- t vs u"));
        assert!(draft_prompt(&request, "p", &[]).contains("(none)"));
    }

    #[test]
    fn test_revision_prompt_carries_feedback_and_body() {
        let prompt = revision_prompt("Old body", "Shorter intro");
        assert!(prompt.contains("Feedback: Shorter intro"));
        assert!(prompt.contains("Current content:\nOld body"));
        assert!(prompt.contains("APPROVAL:"));
    }
}
