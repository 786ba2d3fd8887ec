//! Decay centrality: reach discounted by distance.
//!
//! ```text
//! C_D(v) = Σ_{u≠v reachable} δ^d(v,u),   δ ∈ [0, 1]
//! ```
//!
//! δ = 1 counts reachable nodes, δ = 0 scores every node 0.

use std::fmt;

use super::subset::AdditiveNodeMetric;
use super::{paths, GraphMetric, MetricError, MetricResult};
use crate::abstraction::Graph;
use crate::value_objects::NodeId;

/// Decay centrality with a distance discount in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayCentrality {
    parameter: f64,
}

impl DecayCentrality {
    /// Create a decay metric; fails for parameters outside `[0, 1]`
    pub fn new(parameter: f64) -> MetricResult<Self> {
        Self::validate(parameter)?;
        Ok(Self { parameter })
    }

    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    /// Change the discount. On error the previous value is kept.
    pub fn set_parameter(&mut self, parameter: f64) -> MetricResult<()> {
        Self::validate(parameter)?;
        self.parameter = parameter;
        Ok(())
    }

    fn validate(parameter: f64) -> MetricResult<()> {
        // NaN fails the range check too
        if (0.0..=1.0).contains(&parameter) {
            Ok(())
        } else {
            Err(MetricError::IllegalParameter {
                name: "decay parameter",
                value: parameter,
            })
        }
    }

    fn decayed_sum(&self, graph: &dyn Graph, index: usize, include: &dyn Fn(usize) -> bool) -> f64 {
        paths::bfs_distances(graph, index)
            .into_iter()
            .enumerate()
            .filter(|&(u, _)| u != index && include(u))
            .filter_map(|(_, d)| d)
            .map(|d| self.parameter.powi(i32::try_from(d).unwrap_or(i32::MAX)))
            .sum()
    }
}

impl GraphMetric for DecayCentrality {
    fn value_at(&self, graph: &dyn Graph, index: usize) -> f64 {
        self.decayed_sum(graph, index, &|_: usize| true)
    }

    fn supports_graph(&self, _directed: bool) -> bool {
        true
    }

    #[allow(clippy::cast_precision_loss)]
    fn node_max(&self, _directed: bool, n: usize) -> f64 {
        n.saturating_sub(1) as f64 * self.parameter
    }

    fn central_max(&self, _directed: bool, _n: usize) -> f64 {
        f64::NAN
    }
}

impl AdditiveNodeMetric for DecayCentrality {
    fn contribution(
        &self,
        graph: &dyn Graph,
        index: usize,
        include: &dyn Fn(&NodeId) -> bool,
    ) -> f64 {
        self.decayed_sum(graph, index, &|u: usize| {
            graph.node_at(u).is_some_and(|node| include(&node))
        })
    }
}

impl fmt::Display for DecayCentrality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decay Centrality ({})", self.parameter)
    }
}
