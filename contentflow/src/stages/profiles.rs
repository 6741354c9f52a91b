//! Instruction profiles for the five agent roles.

use crate::core::StageName;

const NEXT_STEPS_INSTRUCTION: &str = "End your response with a \"### Next Steps\" heading followed by 2-4 suggestions, each on its own line starting with \"- \".";

const STRATEGIST: &str = "You are an AI Content Strategist. Develop a content strategy that meets the audience's needs and carries the key messages.
Provide: 1) A refined title, 2) A detailed content outline with sections, 3) Strategic angle and narrative approach, 4) Tone and voice recommendations.
Format your response clearly with labeled sections.";

const SEO_SPECIALIST: &str = "You are an AI SEO Specialist. Analyse search intent for the planned content without changing its core message.
Recommend keyword placement, heading structure and a meta description.
Include a \"Search Queries:\" heading followed by 5-8 lines of the form \"- Type: query - note\", where Type is one of Comparative, Location, Temporal, Personalized, Technical, Entity Expansion, Reformulation, User Intent or Implicit.";

const SPECIALIST_WRITER: &str = "You are an AI Content Writer. Given the strategy and outline, write a full, engaging draft following the provided structure.
Write in the specified tone and voice, incorporating all key messages naturally. Create compelling, well-structured content with proper markdown formatting.";

const HEAD_OF_CONTENT: &str = "You are the Head of Content. Polish the draft for brand alignment, flow, and compliance.
Ensure tone consistency, emphasize key messages, check compliance requirements, and improve overall structure. Return the full refined content.";

const EDITOR_IN_CHIEF: &str = "You are the Editor-in-Chief. Review the content for final approval.
Check: grammar, clarity, engagement, accuracy, SEO, compliance.
Provide your verdict in this exact format:
APPROVAL: [Approved/Needs Revision]
SCORE: [X/10]
COMMENTS: [Your detailed feedback]
FINAL_TITLE: [The final recommended title]";

/// Returns the system instructions for `stage`.
#[must_use]
pub fn instruction_profile(stage: StageName) -> String {
    let base = match stage {
        StageName::Strategy => STRATEGIST,
        StageName::SearchAnalysis => SEO_SPECIALIST,
        StageName::Draft => SPECIALIST_WRITER,
        StageName::BrandRefinement => HEAD_OF_CONTENT,
        StageName::FinalReview => return EDITOR_IN_CHIEF.to_string(),
    };
    format!("{base}\n{NEXT_STEPS_INSTRUCTION}")
}

/// Returns true if `stage` responses carry a next-steps section.
#[must_use]
pub fn expects_next_steps(stage: StageName) -> bool {
    !matches!(stage, StageName::FinalReview)
}

/// Returns true if `stage` responses carry a search-query list.
#[must_use]
pub fn expects_queries(stage: StageName) -> bool {
    matches!(stage, StageName::SearchAnalysis)
}

/// Returns true if `stage` responses carry a reviewer verdict.
#[must_use]
pub fn expects_verdict(stage: StageName) -> bool {
    matches!(stage, StageName::FinalReview)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_match_parser_routing() {
        for stage in StageName::ALL {
            let profile = instruction_profile(stage);
            assert_eq!(profile.contains("### Next Steps"), expects_next_steps(stage), "{stage}");
            assert_eq!(profile.contains("Search Queries:"), expects_queries(stage), "{stage}");
            assert_eq!(profile.contains("FINAL_TITLE:"), expects_verdict(stage), "{stage}");
        }
    }
}
