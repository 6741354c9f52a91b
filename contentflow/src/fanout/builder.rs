//! Bounded breadth-first query expansion.

use super::graph::{NodeId, QueryGraph};
use crate::embedding::{TextEmbedder, DEFAULT_DIMENSION};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Expansion templates. `{query}` is the parent's text, `{title}` the root's.
pub const DEFAULT_TEMPLATES: [&str; 6] = [
    "what is {query}",
    "{query} vs {title}",
    "{query} best practices",
    "examples of {query}",
    "benefits of {query}",
    "{query} vs alternatives",
];

fn default_dimension() -> usize {
    DEFAULT_DIMENSION
}

fn default_minimum_node_count() -> usize {
    20
}

fn default_max_levels() -> usize {
    2
}

/// Size limits for one graph build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutConfig {
    /// Embedding dimension.
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    /// Node count (root included) at which expansion stops.
    #[serde(default = "default_minimum_node_count")]
    pub minimum_node_count: usize,
    /// Maximum number of expansion rounds after seeding.
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
            minimum_node_count: default_minimum_node_count(),
            max_levels: default_max_levels(),
        }
    }
}

impl FanoutConfig {
    /// Sets the embedding dimension.
    #[must_use]
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Sets the target node count.
    #[must_use]
    pub fn with_minimum_node_count(mut self, count: usize) -> Self {
        self.minimum_node_count = count;
        self
    }

    /// Sets the expansion round budget.
    #[must_use]
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }
}

/// Builds query fan-out trees.
///
/// Holds no mutable state, so one builder can serve concurrent builds.
#[derive(Debug, Clone)]
pub struct QueryFanoutBuilder {
    embedder: TextEmbedder,
    templates: Vec<String>,
}

impl Default for QueryFanoutBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl QueryFanoutBuilder {
    /// Creates a builder with the default templates.
    #[must_use]
    pub fn new(dimension: usize) -> Self {
        Self {
            embedder: TextEmbedder::new(dimension),
            templates: DEFAULT_TEMPLATES.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    /// Creates a builder from a config's dimension.
    #[must_use]
    pub fn from_config(config: &FanoutConfig) -> Self {
        Self::new(config.dimension)
    }

    /// Replaces the expansion templates.
    #[must_use]
    pub fn with_templates<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.templates = templates.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the embedder in use.
    #[must_use]
    pub fn embedder(&self) -> &TextEmbedder {
        &self.embedder
    }

    /// Builds with the limits from `config`.
    #[must_use]
    pub fn build_with<S: AsRef<str>>(
        &self,
        title: &str,
        seeds: &[S],
        config: &FanoutConfig,
    ) -> QueryGraph {
        self.build(title, seeds, config.minimum_node_count, config.max_levels)
    }

    /// Builds a tree rooted at `title` with one child per seed, then expands
    /// the newest level with the templates until the graph holds
    /// `minimum_node_count` nodes, `max_levels` rounds have run, or a round
    /// adds nothing.
    #[must_use]
    pub fn build<S: AsRef<str>>(
        &self,
        title: &str,
        seeds: &[S],
        minimum_node_count: usize,
        max_levels: usize,
    ) -> QueryGraph {
        let root_embedding = self.embedder.embed(title);
        let mut graph = QueryGraph::with_root(title, root_embedding.clone());
        let mut seen: HashSet<String> = HashSet::from([title.trim().to_lowercase()]);

        let mut frontier = Vec::with_capacity(seeds.len());
        for seed in seeds {
            let text = seed.as_ref().trim().to_string();
            seen.insert(text.to_lowercase());
            frontier.push(self.add_node(&mut graph, NodeId::ROOT, text, &root_embedding));
        }
        graph.record_round();

        let mut rounds = 0;
        while graph.len() < minimum_node_count && rounds < max_levels && !frontier.is_empty() {
            let mut next = Vec::new();
            'frontier: for &parent in &frontier {
                let base = graph.nodes()[parent.0].text.clone();
                for template in &self.templates {
                    if graph.len() >= minimum_node_count {
                        break 'frontier;
                    }
                    let text = template.replace("{query}", &base).replace("{title}", title);
                    if !seen.insert(text.trim().to_lowercase()) {
                        continue;
                    }
                    next.push(self.add_node(&mut graph, parent, text, &root_embedding));
                }
            }
            rounds += 1;
            graph.record_round();
            debug!(round = rounds, added = next.len(), nodes = graph.len(), "fan-out round");
            frontier = next;
        }

        debug!(
            nodes = graph.len(),
            rounds,
            target = minimum_node_count,
            "fan-out graph built"
        );
        graph
    }

    fn add_node(
        &self,
        graph: &mut QueryGraph,
        parent: NodeId,
        text: String,
        root_embedding: &[f32],
    ) -> NodeId {
        let embedding = self.embedder.embed(&text);
        let similarity = self.embedder.similarity(&embedding, root_embedding);
        graph.push(parent, text, embedding, similarity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SEEDS: [&str; 3] = [
        "sustainable packaging",
        "compostable mailers",
        "packaging costs 2024",
    ];

    #[test]
    fn test_seeds_only_when_target_met() {
        let graph = QueryFanoutBuilder::default().build("Green Packaging", &SEEDS, 4, 2);
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.round_sizes(), &[4]);
        assert!(graph.nodes()[1..].iter().all(|n| n.level == 1));
    }

    #[test]
    fn test_seed_count_is_a_floor() {
        let graph = QueryFanoutBuilder::default().build("Green Packaging", &SEEDS, 0, 0);
        assert_eq!(graph.len(), 1 + SEEDS.len());
    }

    #[test]
    fn test_stops_mid_round_at_target() {
        let graph = QueryFanoutBuilder::default().build("Green Packaging", &SEEDS, 10, 2);
        assert_eq!(graph.len(), 10);
        assert_eq!(graph.round_sizes(), &[4, 10]);
        assert!(graph.is_valid_tree());
        // The first seed got all six templates before the second got one.
        assert_eq!(graph.children(NodeId(1)).len(), 6);
        assert_eq!(graph.nodes()[4].text, "what is sustainable packaging");
        assert_eq!(graph.nodes()[5].text, "sustainable packaging vs Green Packaging");
    }

    #[test]
    fn test_unreachable_target_is_bounded_by_levels() {
        let graph = QueryFanoutBuilder::default().build("Title", &SEEDS, 10_000, 2);
        // Round two yields 108 candidates, but prefix and
        // suffix templates commute ("what is X best practices"), leaving 9
        // repeats per seed.
        assert_eq!(graph.round_sizes(), &[4, 22, 103]);
        assert_eq!(graph.depth(), 3);
        assert!(graph.is_valid_tree());
    }

    #[test]
    fn test_round_sizes_are_monotonic() {
        let graph = QueryFanoutBuilder::default().build("Title", &SEEDS, 50, 5);
        let sizes = graph.round_sizes();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sizes.last(), Some(&graph.len()));
    }

    #[test]
    fn test_duplicate_expansions_freeze_the_graph() {
        let builder = QueryFanoutBuilder::default().with_templates(["{title}"]);
        let graph = builder.build("Title", &["a", "b"], 100, 10);
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.round_sizes(), &[3, 3]);
    }

    #[test]
    fn test_no_seeds_no_growth() {
        let graph = QueryFanoutBuilder::default().build::<&str>("Title", &[], 20, 2);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.root().similarity, 1.0);
    }

    #[test]
    fn test_similarities_are_finite_and_deterministic() {
        let builder = QueryFanoutBuilder::new(16);
        let a = builder.build("Title", &SEEDS, 20, 2);
        let b = builder.build("Title", &SEEDS, 20, 2);
        assert_eq!(a, b);
        assert!(a.nodes().iter().all(|n| n.similarity.is_finite()));
        assert!(a.nodes().iter().all(|n| n.embedding.len() == 16));
    }

    #[test]
    fn test_config_defaults_from_json() {
        let config: FanoutConfig = serde_json::from_str("{\"max_levels\": 3}").unwrap();
        assert_eq!(config, FanoutConfig::default().with_max_levels(3));
        assert_eq!(config.minimum_node_count, 20);
        assert_eq!(config.dimension, 64);
    }
}
