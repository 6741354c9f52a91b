//! Query fan-out tree.

use crate::classify::{classify, QueryType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a node, unique within one graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The title node.
    pub const ROOT: Self = Self(0);

    /// Returns true for the title node.
    #[must_use]
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "root")
        } else {
            write!(f, "q{}", self.0)
        }
    }
}

/// One query in the fan-out tree.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryNode {
    /// Node id.
    pub id: NodeId,
    /// Query text (the title, for the root).
    pub text: String,
    /// Pseudo-embedding of `text`.
    pub embedding: Vec<f32>,
    /// Cosine similarity to the root embedding.
    pub similarity: f32,
    /// Parent node; `None` only for the root.
    pub parent: Option<NodeId>,
    /// Depth: root 0, seeds 1, expansion round k at k + 1.
    pub level: usize,
}

impl QueryNode {
    /// Intent label, computed on demand. The root has none.
    #[must_use]
    pub fn query_type(&self) -> Option<QueryType> {
        if self.id.is_root() {
            None
        } else {
            Some(classify(&self.text))
        }
    }
}

/// A tree of queries rooted at a title node.
///
/// Nodes are stored in creation order, so a node's parent always precedes it
/// and `nodes()[id.0].id == id`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryGraph {
    nodes: Vec<QueryNode>,
    round_sizes: Vec<usize>,
}

impl QueryGraph {
    pub(crate) fn with_root(title: &str, embedding: Vec<f32>) -> Self {
        let root = QueryNode {
            id: NodeId::ROOT,
            text: title.to_string(),
            embedding,
            similarity: 1.0,
            parent: None,
            level: 0,
        };
        Self {
            nodes: vec![root],
            round_sizes: Vec::new(),
        }
    }

    pub(crate) fn push(
        &mut self,
        parent: NodeId,
        text: String,
        embedding: Vec<f32>,
        similarity: f32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let level = self.nodes[parent.0].level + 1;
        self.nodes.push(QueryNode {
            id,
            text,
            embedding,
            similarity,
            parent: Some(parent),
            level,
        });
        id
    }

    pub(crate) fn record_round(&mut self) {
        self.round_sizes.push(self.nodes.len());
    }

    /// The title node.
    #[must_use]
    pub fn root(&self) -> &QueryNode {
        &self.nodes[0]
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&QueryNode> {
        self.nodes.get(id.0)
    }

    /// All nodes in creation order.
    #[must_use]
    pub fn nodes(&self) -> &[QueryNode] {
        &self.nodes
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a graph has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Parent-to-child edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes
            .iter()
            .filter_map(|node| node.parent.map(|parent| (parent, node.id)))
    }

    /// Direct children of `id`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Vec<&QueryNode> {
        self.nodes
            .iter()
            .filter(|node| node.parent == Some(id))
            .collect()
    }

    /// Deepest level present.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.nodes.iter().map(|node| node.level).max().unwrap_or(0)
    }

    /// Node count after seeding and after each expansion round.
    #[must_use]
    pub fn round_sizes(&self) -> &[usize] {
        &self.round_sizes
    }

    /// Ids from `id` up to and including the root, or `None` for an
    /// unknown id or a broken parent chain.
    #[must_use]
    pub fn path_to_root(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let mut path = vec![id];
        let mut current = self.node(id)?;
        while let Some(parent) = current.parent {
            if parent >= current.id || path.len() > self.nodes.len() {
                return None;
            }
            path.push(parent);
            current = self.node(parent)?;
        }
        current.id.is_root().then_some(path)
    }

    /// Checks the tree invariants: ids match positions, only the root lacks a
    /// parent, and every node reaches the root.
    #[must_use]
    pub fn is_valid_tree(&self) -> bool {
        self.nodes.iter().enumerate().all(|(i, node)| {
            node.id == NodeId(i)
                && node.parent.is_none() == node.id.is_root()
                && self.path_to_root(node.id).is_some()
        })
    }

    /// Serializable node/edge view with computed intent labels.
    #[must_use]
    pub fn to_view(&self) -> GraphView {
        let nodes = self
            .nodes
            .iter()
            .map(|node| ViewNode {
                id: node.id.to_string(),
                label: node.text.clone(),
                similarity: node.similarity,
                query_type: node
                    .query_type()
                    .map_or_else(|| "root".to_string(), |t| t.to_string()),
                level: node.level,
            })
            .collect();
        let edges = self
            .edges()
            .map(|(source, target)| ViewEdge {
                source: source.to_string(),
                target: target.to_string(),
            })
            .collect();
        GraphView { nodes, edges }
    }

    /// Non-root nodes as table rows, most similar first.
    #[must_use]
    pub fn query_rows(&self) -> Vec<QueryRow> {
        let mut rows: Vec<QueryRow> = self
            .nodes
            .iter()
            .filter_map(|node| {
                node.query_type().map(|query_type| QueryRow {
                    query_type,
                    query: node.text.clone(),
                    similarity: node.similarity,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
        });
        rows
    }
}

/// Presentation view of a fan-out graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    /// Nodes in creation order.
    pub nodes: Vec<ViewNode>,
    /// Parent-to-child edges.
    pub edges: Vec<ViewEdge>,
}

/// A node in a [`GraphView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    /// Node id as text.
    pub id: String,
    /// Query text.
    pub label: String,
    /// Similarity to the root.
    pub similarity: f32,
    /// Intent label, `"root"` for the title.
    #[serde(rename = "type")]
    pub query_type: String,
    /// Depth.
    pub level: usize,
}

/// An edge in a [`GraphView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewEdge {
    /// Parent id.
    pub source: String,
    /// Child id.
    pub target: String,
}

/// A row of the query table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    /// Intent label.
    #[serde(rename = "type")]
    pub query_type: QueryType,
    /// Query text.
    pub query: String,
    /// Similarity to the root.
    pub similarity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryGraph {
        let mut graph = QueryGraph::with_root("Tracing", vec![1.0, 0.0]);
        let a = graph.push(NodeId::ROOT, "what is tracing".to_string(), vec![1.0, 1.0], 0.7);
        graph.push(NodeId::ROOT, "tracing vs logging".to_string(), vec![0.0, 1.0], 0.0);
        graph.push(a, "meetups in Denver".to_string(), vec![1.0, 0.1], 0.9);
        graph.record_round();
        graph
    }

    #[test]
    fn test_structure() {
        let graph = sample();
        assert_eq!(graph.len(), 4);
        assert!(graph.is_valid_tree());
        assert_eq!(graph.children(NodeId::ROOT).len(), 2);
        assert_eq!(graph.depth(), 2);
        assert_eq!(
            graph.path_to_root(NodeId(3)),
            Some(vec![NodeId(3), NodeId(1), NodeId::ROOT])
        );
        assert_eq!(graph.path_to_root(NodeId(42)), None);
    }

    #[test]
    fn test_edges() {
        let edges: Vec<_> = sample().edges().collect();
        assert_eq!(
            edges,
            vec![
                (NodeId::ROOT, NodeId(1)),
                (NodeId::ROOT, NodeId(2)),
                (NodeId(1), NodeId(3)),
            ]
        );
    }

    #[test]
    fn test_view_labels_types_lazily() {
        let view = sample().to_view();
        assert_eq!(view.nodes[0].id, "root");
        assert_eq!(view.nodes[0].query_type, "root");
        assert_eq!(view.nodes[1].query_type, "reformulation");
        assert_eq!(view.nodes[2].query_type, "comparative");
        assert_eq!(view.nodes[3].query_type, "location");
        assert_eq!(view.edges[2].source, "q1");
        assert_eq!(view.edges[2].target, "q3");
    }

    #[test]
    fn test_query_rows_sorted_by_similarity() {
        let rows = sample().query_rows();
        let order: Vec<_> = rows.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(
            order,
            vec!["meetups in Denver", "what is tracing", "tracing vs logging"]
        );
    }
}
