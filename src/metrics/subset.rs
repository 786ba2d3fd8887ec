//! Group centrality over node subsets.
//!
//! A per-node metric is additive when it can be restricted to a subset of
//! neighbors and summed. Lifting such a metric to a group `F` inside a
//! universe `U` sums, over every member of `F`, its contribution toward
//! `U \ F`. Relations internal to `F` never count.

use std::collections::HashSet;
use std::fmt;

use super::{GraphMetric, MetricError, MetricResult};
use crate::abstraction::Graph;
use crate::value_objects::NodeId;

/// Per-node metric whose value decomposes over neighbors
pub trait AdditiveNodeMetric: GraphMetric {
    /// Value of the node at `index` counting only nodes accepted by `include`
    fn contribution(&self, graph: &dyn Graph, index: usize, include: &dyn Fn(&NodeId) -> bool)
        -> f64;
}

/// Centrality of a group of nodes
pub trait SubsetMetric: fmt::Display + Send + Sync {
    /// Importance of `focus` relative to the rest of `universe`.
    ///
    /// Only the part of `focus` inside `universe` is considered.
    fn value(
        &self,
        graph: &dyn Graph,
        universe: &HashSet<NodeId>,
        focus: &HashSet<NodeId>,
    ) -> MetricResult<f64>;

    /// Importance of `universe \ focus` relative to `focus`
    fn complement_value(
        &self,
        graph: &dyn Graph,
        universe: &HashSet<NodeId>,
        focus: &HashSet<NodeId>,
    ) -> MetricResult<f64> {
        let complement: HashSet<NodeId> = universe.difference(focus).copied().collect();
        self.value(graph, universe, &complement)
    }
}

/// Decorator turning an additive node metric into a group metric
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdditiveSubsetMetric<M> {
    base: M,
}

impl<M: AdditiveNodeMetric> AdditiveSubsetMetric<M> {
    pub fn new(base: M) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &M {
        &self.base
    }
}

impl<M: AdditiveNodeMetric> SubsetMetric for AdditiveSubsetMetric<M> {
    fn value(
        &self,
        graph: &dyn Graph,
        universe: &HashSet<NodeId>,
        focus: &HashSet<NodeId>,
    ) -> MetricResult<f64> {
        if let Some(missing) = universe
            .iter()
            .chain(focus.iter())
            .find(|node| !graph.contains_node(node))
        {
            return Err(MetricError::NodeNotFound(*missing));
        }

        let outside = |node: &NodeId| universe.contains(node) && !focus.contains(node);

        // Graph order keeps the floating point sum reproducible
        let total = graph
            .nodes()
            .iter()
            .enumerate()
            .filter(|(_, node)| focus.contains(*node) && universe.contains(*node))
            .map(|(index, _)| self.base.contribution(graph, index, &outside))
            .sum();

        Ok(total)
    }
}

impl<M: fmt::Display> fmt::Display for AdditiveSubsetMetric<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Group {}", self.base)
    }
}
