//! Query fan-out: a title plus seed queries expanded into a scored tree.

mod builder;
mod graph;

pub use builder::{FanoutConfig, QueryFanoutBuilder, DEFAULT_TEMPLATES};
pub use graph::{GraphView, NodeId, QueryGraph, QueryNode, QueryRow, ViewEdge, ViewNode};
