//! Betweenness centrality: measuring brokerage and bridging.
//!
//! # Definition
//!
//! ```text
//! C_B(v) = Σ_{s≠v≠t} σ_st(v) / σ_st
//! ```
//!
//! where σ_st is the number of shortest s→t paths and σ_st(v) the number of
//! those passing through v. Undirected graphs count each unordered pair once.
//!
//! # Algorithm
//!
//! Brandes (2001): one BFS per source plus a backward dependency pass, O(VE)
//! for unweighted graphs instead of enumerating paths.

use std::fmt;

use super::{paths, GraphMetric};
use crate::abstraction::Graph;

/// Betweenness centrality (raw, not normalised)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BetweennessCentrality;

impl BetweennessCentrality {
    fn compute(graph: &dyn Graph) -> Vec<f64> {
        let mut betweenness = paths::brandes(graph);
        if !graph.is_directed() {
            for b in &mut betweenness {
                *b /= 2.0;
            }
        }
        betweenness
    }
}

impl GraphMetric for BetweennessCentrality {
    fn value_at(&self, graph: &dyn Graph, index: usize) -> f64 {
        Self::compute(graph)[index]
    }

    fn all_values(&self, graph: &dyn Graph) -> Vec<f64> {
        Self::compute(graph)
    }

    fn supports_graph(&self, _directed: bool) -> bool {
        true
    }

    #[allow(clippy::cast_precision_loss)]
    fn node_max(&self, directed: bool, n: usize) -> f64 {
        if n < 2 {
            return 0.0;
        }
        let pairs = ((n - 1) * (n - 2)) as f64;
        if directed {
            pairs
        } else {
            pairs / 2.0
        }
    }

    fn central_max(&self, _directed: bool, _n: usize) -> f64 {
        f64::NAN
    }
}

impl fmt::Display for BetweennessCentrality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Betweenness Centrality")
    }
}
