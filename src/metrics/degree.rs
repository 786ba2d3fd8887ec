//! Degree centrality, the additive base for group metrics.

use std::fmt;

use super::subset::AdditiveNodeMetric;
use super::GraphMetric;
use crate::abstraction::Graph;
use crate::value_objects::NodeId;

/// Number of incident edges (out-edges for directed graphs)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DegreeCentrality;

impl GraphMetric for DegreeCentrality {
    #[allow(clippy::cast_precision_loss)]
    fn value_at(&self, graph: &dyn Graph, index: usize) -> f64 {
        graph.out_neighbors(index).len() as f64
    }

    fn supports_graph(&self, _directed: bool) -> bool {
        true
    }

    #[allow(clippy::cast_precision_loss)]
    fn node_max(&self, _directed: bool, n: usize) -> f64 {
        n.saturating_sub(1) as f64
    }

    /// Reached by the star graph
    #[allow(clippy::cast_precision_loss)]
    fn central_max(&self, directed: bool, n: usize) -> f64 {
        if n < 2 {
            return 0.0;
        }
        let spokes = (n - 1) as f64;
        if directed {
            spokes * spokes
        } else {
            spokes * (n - 2) as f64
        }
    }
}

impl AdditiveNodeMetric for DegreeCentrality {
    #[allow(clippy::cast_precision_loss)]
    fn contribution(
        &self,
        graph: &dyn Graph,
        index: usize,
        include: &dyn Fn(&NodeId) -> bool,
    ) -> f64 {
        graph
            .out_neighbors(index)
            .into_iter()
            .filter_map(|u| graph.node_at(u))
            .filter(|node| include(node))
            .count() as f64
    }
}

impl fmt::Display for DegreeCentrality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Degree Centrality")
    }
}
