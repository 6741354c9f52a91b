//! Editorial verdict and revision parsing.

use serde::{Deserialize, Serialize};

/// Approval label used when the reviewer gave none.
pub const DEFAULT_APPROVAL: &str = "Approved";
/// Score used when the reviewer gave none.
pub const DEFAULT_SCORE: &str = "8/10";
/// Score used when a revision response carries none.
pub const DEFAULT_REVISION_SCORE: &str = "9/10";
/// Approval label for content that needs another pass.
pub const NEEDS_REVISION: &str = "Needs Revision";

const APPROVAL_LABEL: &str = "APPROVAL:";
const SCORE_LABEL: &str = "SCORE:";
const COMMENTS_LABEL: &str = "COMMENTS:";
const TITLE_LABEL: &str = "FINAL_TITLE:";

/// Coarse grouping of a numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    /// 8 and above.
    High,
    /// 6 or 7.
    Medium,
    /// Below 6, or unreadable.
    Low,
}

/// Reviewer verdict on a finished piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Approval label, e.g. "Approved" or "Needs Revision".
    pub approval: String,
    /// Score as written, e.g. "8/10".
    pub score: String,
    /// Reviewer comments.
    pub comments: String,
    /// Recommended final title.
    pub final_title: String,
    /// True if at least one field fell back to its default.
    #[serde(default)]
    pub defaults_applied: bool,
}

impl Verdict {
    /// The verdict used when nothing could be parsed.
    #[must_use]
    pub fn defaults(topic: &str) -> Self {
        Self {
            approval: DEFAULT_APPROVAL.to_string(),
            score: DEFAULT_SCORE.to_string(),
            comments: String::new(),
            final_title: topic.to_string(),
            defaults_applied: true,
        }
    }

    /// Leading integer of the score, if any.
    #[must_use]
    pub fn score_value(&self) -> Option<u8> {
        leading_integer(&self.score)
    }

    /// Band for display badges.
    #[must_use]
    pub fn score_band(&self) -> ScoreBand {
        score_band(&self.score)
    }

    /// Returns true if the approval label reads as approved.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approval
            .trim()
            .to_ascii_lowercase()
            .starts_with("approved")
    }
}

/// Revised body with its re-review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Revised body.
    pub body: String,
    /// Approval label.
    pub approval: String,
    /// Score as written.
    pub score: String,
}

fn leading_integer(score: &str) -> Option<u8> {
    let digits: String = score
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Maps a written score such as `"7/10"` to its band.
#[must_use]
pub fn score_band(score: &str) -> ScoreBand {
    match leading_integer(score) {
        Some(value) if value >= 8 => ScoreBand::High,
        Some(value) if value >= 6 => ScoreBand::Medium,
        _ => ScoreBand::Low,
    }
}

fn clean_value(raw: &str) -> &str {
    raw.trim_matches(|c: char| c == '*' || c.is_whitespace())
}

/// Scans `text` line by line for the verdict labels.
///
/// The first occurrence of each label wins; when a line carries more than one
/// label, the leftmost one is read. Missing or blank fields get defaults,
/// with the title falling back to `topic`.
#[must_use]
pub fn extract_verdict(text: &str, topic: &str) -> Verdict {
    let labels = [APPROVAL_LABEL, SCORE_LABEL, COMMENTS_LABEL, TITLE_LABEL];
    let mut values: [Option<String>; 4] = Default::default();

    for line in text.lines() {
        let leftmost = labels
            .iter()
            .enumerate()
            .filter_map(|(slot, label)| line.find(label).map(|pos| (pos, slot, label.len())))
            .min_by_key(|(pos, _, _)| *pos);

        let Some((pos, slot, len)) = leftmost else {
            continue;
        };
        if values[slot].is_some() {
            continue;
        }
        let value = clean_value(&line[pos + len..]);
        if !value.is_empty() {
            values[slot] = Some(value.to_string());
        }
    }

    let defaults_applied = values.iter().any(Option::is_none);
    let [approval, score, comments, final_title] = values;
    Verdict {
        approval: approval.unwrap_or_else(|| DEFAULT_APPROVAL.to_string()),
        score: score.unwrap_or_else(|| DEFAULT_SCORE.to_string()),
        comments: comments.unwrap_or_default(),
        final_title: final_title.unwrap_or_else(|| topic.to_string()),
        defaults_applied,
    }
}

/// Splits a revision response into the revised body and its trailer.
#[must_use]
pub fn extract_revision(text: &str) -> Revision {
    let Some((body, trailer)) = text.split_once(APPROVAL_LABEL) else {
        return Revision {
            body: text.trim().to_string(),
            approval: DEFAULT_APPROVAL.to_string(),
            score: DEFAULT_REVISION_SCORE.to_string(),
        };
    };

    // An approval mention wins over a revision request.
    let trailer_lower = trailer.to_ascii_lowercase();
    let approval = if !trailer_lower.contains("approved")
        && trailer_lower.contains("needs revision")
    {
        NEEDS_REVISION
    } else {
        DEFAULT_APPROVAL
    };

    let score = trailer
        .split_once(SCORE_LABEL)
        .and_then(|(_, rest)| rest.lines().next())
        .map(clean_value)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_REVISION_SCORE);

    Revision {
        body: body.trim().to_string(),
        approval: approval.to_string(),
        score: score.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_verdict() {
        let text = "Overall solid.\nAPPROVAL: Needs Revision\nSCORE: 6/10\nCOMMENTS: Tighten the intro.\nFINAL_TITLE: Packaging That Pays Off";
        let verdict = extract_verdict(text, "Sustainable packaging");
        assert_eq!(
            verdict,
            Verdict {
                approval: "Needs Revision".to_string(),
                score: "6/10".to_string(),
                comments: "Tighten the intro.".to_string(),
                final_title: "Packaging That Pays Off".to_string(),
                defaults_applied: false,
            }
        );
        assert!(!verdict.is_approved());
        assert_eq!(verdict.score_band(), ScoreBand::Medium);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let verdict = extract_verdict("Looks great to me.", "My Topic");
        assert_eq!(verdict, Verdict::defaults("My Topic"));
        assert!(verdict.is_approved());
        assert_eq!(verdict.score_value(), Some(8));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "SCORE: 9/10\nSCORE: 2/10\n";
        let verdict = extract_verdict(text, "t");
        assert_eq!(verdict.score, "9/10");
        assert!(verdict.defaults_applied);
    }

    #[test]
    fn test_markdown_bold_labels() {
        let text = "**APPROVAL:** Approved\n**SCORE:** 9/10";
        let verdict = extract_verdict(text, "t");
        assert_eq!(verdict.approval, "Approved");
        assert_eq!(verdict.score, "9/10");
        assert_eq!(verdict.final_title, "t");
    }

    #[test]
    fn test_blank_value_keeps_default() {
        let verdict = extract_verdict("APPROVAL:\nFINAL_TITLE:   ", "Topic");
        assert_eq!(verdict.approval, DEFAULT_APPROVAL);
        assert_eq!(verdict.final_title, "Topic");
    }

    #[test]
    fn test_leftmost_label_on_a_line() {
        let text = "COMMENTS: raise the SCORE: by adding data";
        let verdict = extract_verdict(text, "t");
        assert_eq!(verdict.comments, "raise the SCORE: by adding data");
        assert_eq!(verdict.score, DEFAULT_SCORE);
    }

    #[test]
    fn test_score_band() {
        assert_eq!(score_band("10/10"), ScoreBand::High);
        assert_eq!(score_band("8/10"), ScoreBand::High);
        assert_eq!(score_band("7/10"), ScoreBand::Medium);
        assert_eq!(score_band("3/10"), ScoreBand::Low);
        assert_eq!(score_band("n/a"), ScoreBand::Low);
    }

    #[test]
    fn test_revision_with_trailer() {
        let text = "Revised body.\n\nSecond paragraph.\n\nAPPROVAL: Needs Revision\nSCORE: 7/10\n";
        let revision = extract_revision(text);
        assert_eq!(revision.body, "Revised body.\n\nSecond paragraph.");
        assert_eq!(revision.approval, NEEDS_REVISION);
        assert_eq!(revision.score, "7/10");
    }

    #[test]
    fn test_revision_approval_mention_wins() {
        let revision = extract_revision("Body\nAPPROVAL: [Approved/Needs Revision]\nSCORE: 8/10");
        assert_eq!(revision.approval, DEFAULT_APPROVAL);
        assert_eq!(revision.score, "8/10");
    }

    #[test]
    fn test_revision_without_trailer() {
        let revision = extract_revision("  Just the new body. ");
        assert_eq!(revision.body, "Just the new body.");
        assert_eq!(revision.approval, DEFAULT_APPROVAL);
        assert_eq!(revision.score, DEFAULT_REVISION_SCORE);
    }
}
