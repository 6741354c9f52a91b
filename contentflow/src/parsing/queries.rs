//! Search-query list extraction.

use crate::classify::{classify, QueryType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*]|\d+[.)])\s+(.*?)\s*$").expect("bullet pattern compiles")
});

#[allow(clippy::expect_used)]
static QUERY_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bquer(?:y|ies)\b").expect("query token pattern compiles"));

/// One query pulled from a search-analysis response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    /// Type the agent labelled the query with, if it used a known label.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,
    /// The query text, original casing.
    pub query: String,
    /// Trailing remark after ` - `, empty when absent.
    #[serde(default)]
    pub note: String,
}

impl ParsedQuery {
    /// Creates an untyped query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query_type: None,
            query: query.into(),
            note: String::new(),
        }
    }

    /// Sets the explicit type.
    #[must_use]
    pub fn with_type(mut self, query_type: QueryType) -> Self {
        self.query_type = Some(query_type);
        self
    }

    /// Returns the agent's label, or the classifier's when there is none.
    #[must_use]
    pub fn effective_type(&self) -> QueryType {
        self.query_type.unwrap_or_else(|| classify(&self.query))
    }
}

fn is_heading(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || BULLET.is_match(trimmed) {
        return false;
    }

    let normalized = trimmed
        .trim_matches(|c: char| c == '#' || c == '*' || c == '_' || c.is_whitespace())
        .to_lowercase();
    if normalized.contains("search queries") {
        return true;
    }

    let has_marker = trimmed.starts_with('#')
        || trimmed.starts_with("**")
        || trimmed.trim_end_matches('*').ends_with(':');
    has_marker && QUERY_TOKEN.is_match(&normalized)
}

fn parse_candidate(text: &str) -> Option<ParsedQuery> {
    let cleaned = text.replace("**", "");
    let mut rest = cleaned.trim();

    let mut query_type = None;
    if let Some((label, remainder)) = rest.split_once(':') {
        if let Some(parsed) = QueryType::from_label(label) {
            query_type = Some(parsed);
            rest = remainder.trim();
        }
    }

    let (query, note) = match rest.split_once(" - ").or_else(|| rest.split_once(" — ")) {
        Some((query, note)) => (query, note.trim()),
        None => (rest, ""),
    };

    let query = query
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim();
    if query.is_empty() {
        return None;
    }

    Some(ParsedQuery {
        query_type,
        query: query.to_string(),
        note: note.to_string(),
    })
}

/// Extracts the list under a search-queries heading.
///
/// Blank lines directly under the heading are skipped. Any other non-bullet
/// line ends the list, so prose under the heading yields no queries.
/// Queries are deduplicated case-insensitively keeping the first spelling.
#[must_use]
pub fn extract_queries(text: &str) -> Vec<ParsedQuery> {
    let mut lines = text.lines();
    if !lines.by_ref().any(is_heading) {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut queries = Vec::new();
    let mut started = false;

    for line in lines {
        let Some(captures) = BULLET.captures(line) else {
            if !started && line.trim().is_empty() {
                continue;
            }
            break;
        };
        started = true;

        let Some(parsed) = captures.get(1).and_then(|m| parse_candidate(m.as_str())) else {
            continue;
        };
        if seen.insert(parsed.query.to_lowercase()) {
            queries.push(parsed);
        }
    }

    queries
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn typed(query_type: QueryType, query: &str, note: &str) -> ParsedQuery {
        ParsedQuery {
            query_type: Some(query_type),
            query: query.to_string(),
            note: note.to_string(),
        }
    }

    #[test]
    fn test_blank_line_after_heading() {
        let text = "Search Queries:\n\n- Reformulation: what is X?\n- Implicit: Y";
        assert_eq!(
            extract_queries(text),
            vec![
                typed(QueryType::Reformulation, "what is X?", ""),
                typed(QueryType::Implicit, "Y", ""),
            ]
        );
    }

    #[test]
    fn test_blank_line_after_match_terminates() {
        let text = "Search Queries:\n1) Comparative: fasttrace vs jaeger\n\n2) Reformulation: what is fasttrace";
        assert_eq!(
            extract_queries(text),
            vec![typed(QueryType::Comparative, "fasttrace vs jaeger", "")]
        );
    }

    #[test]
    fn test_query_with_note() {
        let text = "Search Queries:\n- Comparative: fasttrace vs jaeger - note\n- Reformulation: what is fasttrace - explanation";
        assert_eq!(
            extract_queries(text),
            vec![
                typed(QueryType::Comparative, "fasttrace vs jaeger", "note"),
                typed(QueryType::Reformulation, "what is fasttrace", "explanation"),
            ]
        );
    }

    #[test]
    fn test_numbered_list_stops_at_non_bullet() {
        let text = "Search Queries:\n1. Why use FastTrace?\n2. FastTrace vs Zipkin\nNotes:\n- ignored";
        assert_eq!(
            extract_queries(text),
            vec![
                ParsedQuery::new("Why use FastTrace?"),
                ParsedQuery::new("FastTrace vs Zipkin"),
            ]
        );
    }

    #[test]
    fn test_no_heading_returns_empty() {
        let text = "Here are ideas:\n- what is tracing\n- tracing tools";
        assert!(extract_queries(text).is_empty());
    }

    #[test]
    fn test_markup_heading_with_query_token() {
        let text = "Intro text\n\n## Query Ideas\n* \"tracing in Rust\"\n* **Temporal:** tracing trends 2024";
        assert_eq!(
            extract_queries(text),
            vec![
                ParsedQuery::new("tracing in Rust"),
                typed(QueryType::Temporal, "tracing trends 2024", ""),
            ]
        );
    }

    #[test]
    fn test_query_word_without_marker_is_not_a_heading() {
        let text = "This query is interesting\n- one\n- two";
        assert!(extract_queries(text).is_empty());
    }

    #[test]
    fn test_dedup_is_case_insensitive() {
        let text = "**Search Queries**\n- Tracing Basics\n- tracing basics\n- Implicit: TRACING BASICS\n- Span links";
        let queries = extract_queries(text);
        let texts: Vec<_> = queries.iter().map(|q| q.query.as_str()).collect();
        assert_eq!(texts, vec!["Tracing Basics", "Span links"]);
    }

    #[test]
    fn test_unknown_label_keeps_colon_text() {
        let text = "Search queries:\n- Rust: async tracing";
        assert_eq!(extract_queries(text), vec![ParsedQuery::new("Rust: async tracing")]);
    }

    #[test]
    fn test_prose_under_heading_does_not_reach_next_steps() {
        let text = "Search Queries:\nNo strong query opportunities this time.\n\n### Next Steps\n- Refine the keyword list\n- Interview a supplier";
        assert!(extract_queries(text).is_empty());
    }

    #[test]
    fn test_heading_directly_after_heading_ends_list() {
        let text = "## Search Queries\n\n### Next Steps\n- Refine the keyword list";
        assert!(extract_queries(text).is_empty());
    }

    #[test]
    fn test_effective_type_falls_back_to_classifier() {
        let query = ParsedQuery::new("meetups in Denver");
        assert_eq!(query.effective_type(), QueryType::Location);

        let labelled = ParsedQuery::new("meetups in Denver").with_type(QueryType::Implicit);
        assert_eq!(labelled.effective_type(), QueryType::Implicit);
    }
}
