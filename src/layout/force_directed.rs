//! Fruchterman-Reingold force-directed layout, one relaxation step at a time.
//!
//! Every call to [`IterativeGraphLayout::iterate`] applies pairwise repulsion
//! `k² / d` and edge attraction `d² / k`, then moves each node by at most the
//! current cooling parameter. Cooling itself is driven from outside (see
//! [`CoolingSchedule`](super::CoolingSchedule)).

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{CoolingSchedule, IterativeGraphLayout};
use crate::abstraction::Graph;
use crate::value_objects::{NodeId, Position2D};

/// Smallest distance used in force computations
const MIN_DISTANCE: f64 = 0.01;

/// Force parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceLayoutConfig {
    /// Ideal distance between adjacent nodes
    pub ideal_distance: f64,
}

impl Default for ForceLayoutConfig {
    fn default() -> Self {
        Self {
            ideal_distance: 100.0,
        }
    }
}

/// Force-directed layout state: positions plus the cooling parameter
#[derive(Debug, Clone)]
pub struct ForceDirectedLayout {
    config: ForceLayoutConfig,
    positions: HashMap<NodeId, Position2D>,
    cooling: f64,
}

impl ForceDirectedLayout {
    /// Fresh layout starting at the default schedule's initial cooling
    pub fn new(config: ForceLayoutConfig) -> Self {
        Self {
            config,
            positions: HashMap::new(),
            cooling: CoolingSchedule::default().initial,
        }
    }

    pub fn config(&self) -> &ForceLayoutConfig {
        &self.config
    }

    /// Direction used to push apart two nodes sitting on the same spot
    fn separation_direction() -> Position2D {
        let angle = rand::thread_rng().gen_range(0.0..std::f64::consts::TAU);
        Position2D::new(angle.cos(), angle.sin())
    }
}

impl Default for ForceDirectedLayout {
    fn default() -> Self {
        Self::new(ForceLayoutConfig::default())
    }
}

impl IterativeGraphLayout for ForceDirectedLayout {
    fn iterate(&mut self, graph: &dyn Graph) {
        // Only nodes that are both in the graph and placed take part
        let placed: Vec<(NodeId, Position2D)> = graph
            .nodes()
            .into_iter()
            .filter_map(|node| self.positions.get(&node).map(|p| (node, *p)))
            .collect();
        if placed.is_empty() {
            return;
        }

        let slot: HashMap<NodeId, usize> = placed
            .iter()
            .enumerate()
            .map(|(i, (node, _))| (*node, i))
            .collect();

        let k = self.config.ideal_distance;
        let k_squared = k * k;
        let mut displacements = vec![Position2D::ORIGIN; placed.len()];

        // Repulsive forces
        for i in 0..placed.len() {
            for j in (i + 1)..placed.len() {
                let delta = placed[i].1 - placed[j].1;
                let length = delta.length();
                let direction = if length > 0.0 {
                    delta * (1.0 / length)
                } else {
                    Self::separation_direction()
                };
                let force = direction * (k_squared / length.max(MIN_DISTANCE));
                displacements[i] += force;
                displacements[j] -= force;
            }
        }

        // Attractive forces for edges
        for (source, target) in graph.edges() {
            if source == target {
                continue;
            }
            if let (Some(&s), Some(&t)) = (slot.get(&source), slot.get(&target)) {
                let delta = placed[t].1 - placed[s].1;
                let distance = delta.length().max(MIN_DISTANCE);
                let force = delta.normalize() * (distance * distance / k);
                displacements[s] += force;
                displacements[t] -= force;
            }
        }

        // Apply displacements capped by the cooling parameter
        for ((node, position), displacement) in placed.iter().zip(displacements) {
            let length = displacement.length();
            if length == 0.0 || !length.is_finite() {
                continue;
            }
            let step = displacement.normalize() * length.min(self.cooling);
            self.positions.insert(*node, *position + step);
        }
    }

    fn request_positions(&mut self, positions: HashMap<NodeId, Position2D>, force_reset: bool) {
        if force_reset {
            self.positions = positions;
        } else {
            self.positions.extend(positions);
        }
    }

    fn positions(&self) -> HashMap<NodeId, Position2D> {
        self.positions.clone()
    }

    fn cooling_parameter(&self) -> f64 {
        self.cooling
    }

    fn set_cooling_parameter(&mut self, value: f64) {
        self.cooling = value;
    }
}
