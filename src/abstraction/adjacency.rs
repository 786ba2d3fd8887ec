//! Petgraph-backed implementation of [`Graph`]

use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use super::{Graph, GraphError, GraphResult};
use crate::value_objects::NodeId;

/// In-memory graph with insertion-ordered nodes.
///
/// Nodes are never removed, so petgraph indices and the insertion order of
/// `index` always agree.
#[derive(Debug, Clone)]
pub struct AdjacencyGraph {
    directed: bool,
    graph: DiGraph<NodeId, ()>,
    index: IndexMap<NodeId, NodeIndex>,
}

impl AdjacencyGraph {
    /// Create an empty graph
    pub fn new(directed: bool) -> Self {
        Self {
            directed,
            graph: DiGraph::new(),
            index: IndexMap::new(),
        }
    }

    /// Create an empty directed graph
    pub fn directed() -> Self {
        Self::new(true)
    }

    /// Create an empty undirected graph
    pub fn undirected() -> Self {
        Self::new(false)
    }

    /// Build a graph from numeric labels, adding nodes in first-seen order
    /// (listed nodes first, then edge endpoints).
    pub fn from_labels(directed: bool, nodes: &[u64], edges: &[(u64, u64)]) -> Self {
        let mut graph = Self::new(directed);
        for &label in nodes {
            graph.ensure_node(NodeId::from_label(label));
        }
        for &(source, target) in edges {
            let source = graph.ensure_node(NodeId::from_label(source));
            let target = graph.ensure_node(NodeId::from_label(target));
            graph.graph.add_edge(source, target, ());
        }
        graph
    }

    /// Add a node; fails if it is already present
    pub fn add_node(&mut self, node: NodeId) -> GraphResult<()> {
        if self.index.contains_key(&node) {
            return Err(GraphError::DuplicateNode(node));
        }
        self.ensure_node(node);
        Ok(())
    }

    /// Add an edge between two existing nodes
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> GraphResult<()> {
        let s = *self
            .index
            .get(&source)
            .ok_or(GraphError::NodeNotFound(source))?;
        let t = *self
            .index
            .get(&target)
            .ok_or(GraphError::NodeNotFound(target))?;
        self.graph.add_edge(s, t, ());
        Ok(())
    }

    fn ensure_node(&mut self, node: NodeId) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node);
        self.index.insert(node, idx);
        idx
    }

    fn collect_neighbors(&self, index: usize, direction: Direction) -> Vec<usize> {
        if index >= self.graph.node_count() {
            return Vec::new();
        }
        let idx = NodeIndex::new(index);
        if self.directed {
            self.graph
                .neighbors_directed(idx, direction)
                .map(|n| n.index())
                .collect()
        } else {
            self.graph
                .neighbors_undirected(idx)
                .map(|n| n.index())
                .collect()
        }
    }
}

impl Graph for AdjacencyGraph {
    fn is_directed(&self) -> bool {
        self.directed
    }

    fn nodes(&self) -> Vec<NodeId> {
        self.index.keys().copied().collect()
    }

    fn node_count(&self) -> usize {
        self.index.len()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(s, t)| (self.graph[s], self.graph[t]))
            .collect()
    }

    fn index_of(&self, node: &NodeId) -> Option<usize> {
        self.index.get_index_of(node)
    }

    fn node_at(&self, index: usize) -> Option<NodeId> {
        self.index.get_index(index).map(|(node, _)| *node)
    }

    fn out_neighbors(&self, index: usize) -> Vec<usize> {
        self.collect_neighbors(index, Direction::Outgoing)
    }

    fn in_neighbors(&self, index: usize) -> Vec<usize> {
        self.collect_neighbors(index, Direction::Incoming)
    }
}
