//! Heuristic intent classification for search queries.
//!
//! Classification is a first-match cascade over an ordered rule list, not a
//! scored model. Reordering the rules changes results.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Intent label assigned to a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    /// Compares two or more options.
    Comparative,
    /// Tied to a place.
    Location,
    /// Tied to a date, duration or recency.
    Temporal,
    /// Phrased in the first person.
    Personalized,
    /// Troubleshooting or code vocabulary.
    Technical,
    /// Looks for alternatives to or relatives of an entity.
    EntityExpansion,
    /// Asks for a definition.
    Reformulation,
    /// Opens with an interrogative.
    UserIntent,
    /// Nothing more specific matched.
    Implicit,
}

impl QueryType {
    /// All labels in cascade order.
    pub const ALL: [Self; 9] = [
        Self::Comparative,
        Self::Location,
        Self::Temporal,
        Self::Personalized,
        Self::Technical,
        Self::EntityExpansion,
        Self::Reformulation,
        Self::UserIntent,
        Self::Implicit,
    ];

    /// Returns the wire label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comparative => "comparative",
            Self::Location => "location",
            Self::Temporal => "temporal",
            Self::Personalized => "personalized",
            Self::Technical => "technical",
            Self::EntityExpansion => "entity_expansion",
            Self::Reformulation => "reformulation",
            Self::UserIntent => "user_intent",
            Self::Implicit => "implicit",
        }
    }

    /// Parses a loosely written label such as `"Entity Expansion"` or
    /// `"user-intent"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL.into_iter().find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown query type: {s}"))
    }
}

/// Ordered rule table. The final `Implicit` fallback is not a rule.
const RULES: [(QueryType, &str); 8] = [
    (
        QueryType::Comparative,
        r"(?i)\b(vs|versus|compare|compared|comparing|comparison|better than|worse than|differences? between)\b",
    ),
    (
        QueryType::Location,
        r"\b(?i:in|near|around|at)\s+[A-Z][A-Za-z]+|(?i)\b(near me|nearby|local|locations?|city|cities)\b",
    ),
    (
        QueryType::Temporal,
        r"(?i)\b(\d+[- ]?(day|week|month|year)s?|(19|20)\d{2}|today|tonight|tomorrow|yesterday|(this|next|last) (week|month|quarter|year)|latest|recent|recently|newest|upcoming|current|currently|now|timeline|roadmap|deadline)\b",
    ),
    (
        QueryType::Personalized,
        r"(?i)\b(my|me|mine|i|our|ours|we|us)\b",
    ),
    (
        QueryType::Technical,
        r"(?i)\b(errors?|bugs?|fix|debug|debugging|troubleshoot|troubleshooting|install|installation|configure|configuration|setup|set up|api|sdk|code|script|command|syntax|exception|crash|not working|stack trace|compile)\b",
    ),
    (
        QueryType::EntityExpansion,
        r"(?i)\b(alternatives?|similar|competitors?|instead of|such as|related)\b",
    ),
    (
        QueryType::Reformulation,
        r"(?i)\b(what is|what are|what's|define|definition of|meaning of|explain|explanation of)\b",
    ),
    (
        QueryType::UserIntent,
        r"(?i)^\s*(how|why|what|when|where|which|who|can|should|is|are|does|do|will)\b",
    ),
];

/// Compiled classifier.
#[derive(Debug, Clone)]
pub struct QueryClassifier {
    rules: Vec<(QueryType, Regex)>,
}

static SHARED: LazyLock<QueryClassifier> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    QueryClassifier::try_new().expect("built-in classifier patterns compile")
});

impl QueryClassifier {
    /// Compiles the rule table.
    pub fn try_new() -> Result<Self, regex::Error> {
        let rules = RULES
            .iter()
            .map(|(label, pattern)| Regex::new(pattern).map(|re| (*label, re)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Returns the process-wide compiled classifier.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    /// Classifies `query`; the first matching rule wins.
    #[must_use]
    pub fn classify(&self, query: &str) -> QueryType {
        self.rules
            .iter()
            .find(|(_, re)| re.is_match(query))
            .map_or(QueryType::Implicit, |(label, _)| *label)
    }
}

/// Classifies `query` with the shared classifier.
#[must_use]
pub fn classify(query: &str) -> QueryType {
    QueryClassifier::shared().classify(query)
}
