//! Eigenvector centrality approximated by power iteration.
//!
//! A node is important if it is connected to other important nodes:
//!
//! ```text
//! x_v = (1/λ) × Σ_{u→v} x_u
//! ```
//!
//! 1. Initialize x uniformly
//! 2. Repeat: x' = A × x, then normalize x' = x' / ||x'||
//! 3. Stop when ||x' - x|| < tolerance or the iteration cap is hit
//!
//! Disconnected or periodic graphs may never converge; the estimate at the
//! cap is returned as is.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::GraphMetric;
use crate::abstraction::Graph;

/// Configuration for the power iteration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenConfig {
    /// Maximum iterations before stopping
    pub max_iterations: usize,
    /// Convergence tolerance (L2 norm of change)
    pub tolerance: f64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
        }
    }
}

/// Approximate eigenvector centrality
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EigenCentrality {
    config: EigenConfig,
}

impl EigenCentrality {
    pub fn new(config: EigenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EigenConfig {
        &self.config
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute(&self, graph: &dyn Graph) -> Vec<f64> {
        let n = graph.node_count();
        if n == 0 {
            return Vec::new();
        }

        let uniform = 1.0 / (n as f64).sqrt();
        let mut scores = vec![uniform; n];
        let mut next = vec![0.0; n];

        // In-edges carry importance; undirected graphs report every neighbor
        let sources: Vec<Vec<usize>> = (0..n).map(|v| graph.in_neighbors(v)).collect();

        for _ in 0..self.config.max_iterations {
            next.fill(0.0);
            for (v, preds) in sources.iter().enumerate() {
                for &u in preds {
                    next[v] += scores[u];
                }
            }

            let norm = next.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                for x in &mut next {
                    *x /= norm;
                }
            } else {
                // No edges to propagate along
                next.fill(uniform);
            }

            let diff = scores
                .iter()
                .zip(next.iter())
                .map(|(old, new)| (old - new).powi(2))
                .sum::<f64>()
                .sqrt();

            std::mem::swap(&mut scores, &mut next);

            if diff < self.config.tolerance {
                break;
            }
        }

        scores
    }
}

impl GraphMetric for EigenCentrality {
    fn value_at(&self, graph: &dyn Graph, index: usize) -> f64 {
        self.compute(graph)[index]
    }

    fn all_values(&self, graph: &dyn Graph) -> Vec<f64> {
        self.compute(graph)
    }

    fn supports_graph(&self, _directed: bool) -> bool {
        true
    }

    fn node_max(&self, _directed: bool, _n: usize) -> f64 {
        1.0
    }

    fn central_max(&self, _directed: bool, _n: usize) -> f64 {
        f64::NAN
    }
}

impl fmt::Display for EigenCentrality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Eigenvalue Centrality (approx)")
    }
}
