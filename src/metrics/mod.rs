//! Centrality metrics
//!
//! Every metric implements [`GraphMetric`]: a per-node value, the theoretical
//! per-node maximum for a graph of a given size, and (when a closed form
//! exists) the maximum Freeman centralization used to normalise graph-level
//! scores.
//!
//! ```text
//! C(G) = Σ_i [C(v*) - C(v_i)] / max_G' Σ_i [C(v'*) - C(v'_i)]
//! ```
//!
//! Metrics are small value objects. They never cache anything between calls,
//! so the same instance can be shared across threads.

use std::fmt;

use crate::abstraction::Graph;
use crate::value_objects::NodeId;

mod betweenness;
mod closeness;
mod decay;
mod degree;
mod eigen;
pub(crate) mod paths;
mod subset;

pub use betweenness::BetweennessCentrality;
pub use closeness::ClosenessCentrality;
pub use decay::DecayCentrality;
pub use degree::DegreeCentrality;
pub use eigen::{EigenCentrality, EigenConfig};
pub use subset::{AdditiveNodeMetric, AdditiveSubsetMetric, SubsetMetric};

/// Errors raised by metric computations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Illegal value for {name}: {value}")]
    IllegalParameter { name: &'static str, value: f64 },

    #[error("{metric} does not support {} graphs", orientation(.directed))]
    UnsupportedGraphOrientation { metric: String, directed: bool },
}

fn orientation(directed: &bool) -> &'static str {
    if *directed {
        "directed"
    } else {
        "undirected"
    }
}

/// Result type for metric operations
pub type MetricResult<T> = Result<T, MetricError>;

/// Common contract for node centrality metrics
pub trait GraphMetric: fmt::Display + Send + Sync {
    /// Value of the node at `index` in [`Graph::nodes`].
    ///
    /// `index` must be in range; [`GraphMetric::value`] is the checked entry
    /// point.
    fn value_at(&self, graph: &dyn Graph, index: usize) -> f64;

    /// Whether the metric is defined for graphs of this orientation
    fn supports_graph(&self, directed: bool) -> bool;

    /// Largest value a single node can reach in any graph with `n` nodes
    fn node_max(&self, directed: bool, n: usize) -> f64;

    /// Largest possible Freeman centralization, NaN when no closed form is
    /// known
    fn central_max(&self, directed: bool, n: usize) -> f64;

    /// Value of a single node
    fn value(&self, graph: &dyn Graph, node: &NodeId) -> MetricResult<f64> {
        let index = graph
            .index_of(node)
            .ok_or(MetricError::NodeNotFound(*node))?;
        Ok(self.value_at(graph, index))
    }

    /// Values of all nodes in graph order.
    ///
    /// Overrides must return exactly what `value_at` returns per node.
    fn all_values(&self, graph: &dyn Graph) -> Vec<f64> {
        (0..graph.node_count())
            .map(|index| self.value_at(graph, index))
            .collect()
    }

    /// Freeman centralization of the whole graph.
    ///
    /// `None` when the metric has no closed-form `central_max` or the graph
    /// is empty.
    fn centralization(&self, graph: &dyn Graph) -> Option<f64> {
        let n = graph.node_count();
        if n == 0 {
            return None;
        }
        let central_max = self.central_max(graph.is_directed(), n);
        if !central_max.is_finite() || central_max == 0.0 {
            return None;
        }

        let values = self.all_values(graph);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(values.iter().map(|v| max - v).sum::<f64>() / central_max)
    }
}

/// Check a metric against a graph's orientation before computing.
pub fn ensure_supported(metric: &dyn GraphMetric, graph: &dyn Graph) -> MetricResult<()> {
    let directed = graph.is_directed();
    if metric.supports_graph(directed) {
        Ok(())
    } else {
        Err(MetricError::UnsupportedGraphOrientation {
            metric: metric.to_string(),
            directed,
        })
    }
}
