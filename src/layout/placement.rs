//! Placement heuristics for nodes the layout has never seen
//!
//! The very first graph gets a ring around the origin. Nodes joining later
//! are dropped next to the centroid of their already-placed neighbors so the
//! running layout only has to make small corrections.

use std::collections::HashMap;

use rand::Rng;

use crate::abstraction::Graph;
use crate::value_objects::{NodeId, Position2D};

/// Evenly spaced ring in the given node order
pub fn ring_positions(nodes: &[NodeId], radius: f64) -> Vec<(NodeId, Position2D)> {
    if nodes.len() == 1 {
        return vec![(nodes[0], Position2D::ORIGIN)];
    }

    let angle_increment = std::f64::consts::TAU / nodes.len() as f64;
    nodes
        .iter()
        .enumerate()
        .map(|(i, node)| {
            let angle = i as f64 * angle_increment;
            (*node, Position2D::new(radius * angle.cos(), radius * angle.sin()))
        })
        .collect()
}

/// Place newly added nodes near their placed neighbors.
///
/// Nodes are placed one after another, so a new node can anchor on another
/// new node placed before it. Nodes without placed neighbors land at a random
/// spot within `radius` of the origin. A radius or jitter that is not a
/// positive finite number collapses to zero.
pub fn adding_positions<R: Rng>(
    graph: &dyn Graph,
    new_nodes: &[NodeId],
    known: &HashMap<NodeId, Position2D>,
    radius: f64,
    jitter: f64,
    rng: &mut R,
) -> Vec<(NodeId, Position2D)> {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let jitter = if jitter.is_finite() { jitter.max(0.0) } else { 0.0 };
    let mut placed: HashMap<NodeId, Position2D> = HashMap::new();
    let mut result = Vec::with_capacity(new_nodes.len());

    for node in new_nodes {
        let neighbors = neighbors_both_ways(graph, node);
        let anchors: Vec<Position2D> = neighbors
            .iter()
            .filter_map(|n| known.get(n).or_else(|| placed.get(n)).copied())
            .collect();

        let position = if anchors.is_empty() && radius == 0.0 {
            Position2D::ORIGIN
        } else if anchors.is_empty() {
            Position2D::new(
                rng.gen_range(-radius..=radius),
                rng.gen_range(-radius..=radius),
            )
        } else {
            let mut center = Position2D::ORIGIN;
            for anchor in &anchors {
                center += *anchor;
            }
            center = center * (1.0 / anchors.len() as f64);
            center + Position2D::new(
                (rng.gen::<f64>() - 0.5) * jitter,
                (rng.gen::<f64>() - 0.5) * jitter,
            )
        };

        placed.insert(*node, position);
        result.push((*node, position));
    }

    result
}

fn neighbors_both_ways(graph: &dyn Graph, node: &NodeId) -> Vec<NodeId> {
    let Some(index) = graph.index_of(node) else {
        return Vec::new();
    };
    let mut indices = graph.out_neighbors(index);
    if graph.is_directed() {
        indices.extend(graph.in_neighbors(index));
    }
    indices
        .into_iter()
        .filter(|&i| i != index)
        .filter_map(|i| graph.node_at(i))
        .collect()
}
