//! Graph abstraction layer that provides a read-only query surface over any
//! graph implementation supplied by a collaborator (importers, editors, ...).
//!
//! Metrics and the layout engine only ever see `&dyn Graph`. A graph is never
//! edited while a computation holds it; changing the graph means handing over
//! a new `Arc<dyn Graph>`.

use crate::value_objects::NodeId;

mod adjacency;

pub use adjacency::AdjacencyGraph;

/// Errors that can occur while assembling a graph
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("Node already present: {0}")]
    DuplicateNode(NodeId),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Trait that every graph handed to the analytics core must implement.
///
/// Nodes are addressed both by `NodeId` and by their dense position in
/// [`Graph::nodes`]; traversal works on indices so shortest-path code can use
/// flat vectors.
pub trait Graph: Send + Sync {
    /// Whether edges are directed
    fn is_directed(&self) -> bool;

    /// All nodes in stable iteration order
    fn nodes(&self) -> Vec<NodeId>;

    /// Number of nodes
    fn node_count(&self) -> usize;

    /// Number of edges (multi-edges and self-loops included)
    fn edge_count(&self) -> usize;

    /// All edges as (source, target) pairs
    fn edges(&self) -> Vec<(NodeId, NodeId)>;

    /// Position of a node in [`Graph::nodes`]
    fn index_of(&self, node: &NodeId) -> Option<usize>;

    /// Node at a position in [`Graph::nodes`]
    fn node_at(&self, index: usize) -> Option<NodeId>;

    /// Indices reachable over one edge. For undirected graphs this is every
    /// adjacent node.
    fn out_neighbors(&self, index: usize) -> Vec<usize>;

    /// Indices with an edge pointing at `index`. Same as
    /// [`Graph::out_neighbors`] for undirected graphs.
    fn in_neighbors(&self, index: usize) -> Vec<usize>;

    /// Check whether a node belongs to the graph
    fn contains_node(&self, node: &NodeId) -> bool {
        self.index_of(node).is_some()
    }

    /// Neighbors of a node by identifier
    fn neighbors(&self, node: &NodeId) -> Vec<NodeId> {
        self.index_of(node)
            .map(|index| {
                self.out_neighbors(index)
                    .into_iter()
                    .filter_map(|i| self.node_at(i))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Out-degree (plain degree for undirected graphs)
    fn degree(&self, node: &NodeId) -> usize {
        self.index_of(node)
            .map(|index| self.out_neighbors(index).len())
            .unwrap_or(0)
    }
}
