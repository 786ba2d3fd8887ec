//! Closeness centrality in its sum and max flavours.
//!
//! ```text
//! sum:  C_C(v) = (n - 1) / Σ_u d(v, u)
//! max:  C_G(v) = 1 / max_u d(v, u)
//! ```
//!
//! Only reachable nodes take part in either aggregate; a node that reaches
//! nothing scores 0.

use std::fmt;

use super::{paths, GraphMetric};
use crate::abstraction::Graph;

/// Closeness centrality. `use_sum` selects the sum variant ("Closeness
/// Centrality") over the eccentricity variant ("Graph Centrality").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosenessCentrality {
    use_sum: bool,
}

impl ClosenessCentrality {
    /// Sum-of-distances variant
    pub const SUM: Self = Self { use_sum: true };
    /// Maximum-distance (graph centrality) variant
    pub const MAX: Self = Self { use_sum: false };

    pub fn new(use_sum: bool) -> Self {
        Self { use_sum }
    }

    pub fn uses_sum(&self) -> bool {
        self.use_sum
    }
}

impl Default for ClosenessCentrality {
    fn default() -> Self {
        Self::SUM
    }
}

impl GraphMetric for ClosenessCentrality {
    #[allow(clippy::cast_precision_loss)]
    fn value_at(&self, graph: &dyn Graph, index: usize) -> f64 {
        let reachable = paths::bfs_distances(graph, index)
            .into_iter()
            .enumerate()
            .filter(|&(u, _)| u != index)
            .filter_map(|(_, d)| d);

        if self.use_sum {
            let total: usize = reachable.sum();
            if total == 0 {
                return 0.0;
            }
            (graph.node_count() - 1) as f64 / total as f64
        } else {
            match reachable.max() {
                Some(eccentricity) if eccentricity > 0 => 1.0 / eccentricity as f64,
                _ => 0.0,
            }
        }
    }

    fn supports_graph(&self, _directed: bool) -> bool {
        true
    }

    #[allow(clippy::cast_precision_loss)]
    fn node_max(&self, _directed: bool, n: usize) -> f64 {
        if !self.use_sum {
            return 1.0;
        }
        if n < 2 {
            0.0
        } else {
            1.0 / (n - 1) as f64
        }
    }

    fn central_max(&self, _directed: bool, _n: usize) -> f64 {
        f64::NAN
    }
}

impl fmt::Display for ClosenessCentrality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.use_sum {
            write!(f, "Closeness Centrality")
        } else {
            write!(f, "Graph Centrality")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abstraction::AdjacencyGraph;
    use crate::metrics::test_graphs::seven_node;
    use crate::value_objects::NodeId;

    #[test]
    fn test_sum_variant_on_seven_node_graph() {
        let graph = seven_node();
        let value = ClosenessCentrality::SUM
            .value(&graph, &NodeId::from_label(1))
            .unwrap();
        assert_eq!(value, 6.0 / 13.0);
    }

    #[test]
    fn test_max_variant_on_seven_node_graph() {
        let graph = seven_node();
        let value = ClosenessCentrality::MAX
            .value(&graph, &NodeId::from_label(4))
            .unwrap();
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_unreachable_nodes_are_excluded() {
        // 1 -> 2 and an isolated 3: node 1 only sums the distance to 2
        let graph = AdjacencyGraph::from_labels(true, &[1, 2, 3], &[(1, 2)]);
        let values = ClosenessCentrality::SUM.all_values(&graph);

        assert_eq!(values, vec![2.0, 0.0, 0.0]);
        assert_eq!(ClosenessCentrality::MAX.all_values(&graph), vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_node_max() {
        assert_eq!(ClosenessCentrality::SUM.node_max(true, 10), 1.0 / 9.0);
        assert_eq!(ClosenessCentrality::SUM.node_max(false, 10), 1.0 / 9.0);
        for n in [0, 1, 2, 50, 10_000] {
            assert_eq!(ClosenessCentrality::MAX.node_max(true, n), 1.0);
            assert_eq!(ClosenessCentrality::MAX.node_max(false, n), 1.0);
        }
    }

    #[test]
    fn test_central_max_is_nan() {
        assert!(ClosenessCentrality::SUM.central_max(true, 10).is_nan());
        assert!(ClosenessCentrality::MAX.central_max(false, 10).is_nan());
    }

    #[test]
    fn test_names() {
        assert_eq!(ClosenessCentrality::new(true).to_string(), "Closeness Centrality");
        assert_eq!(ClosenessCentrality::new(false).to_string(), "Graph Centrality");
        assert!(ClosenessCentrality::default().uses_sum());
    }
}
