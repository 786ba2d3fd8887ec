//! Shortest-path traversal shared by the distance-based metrics.
//!
//! Everything here works on dense node indices (see [`Graph::index_of`]) and
//! counts hops; edge weights are not part of the graph surface.

use std::collections::VecDeque;

use crate::abstraction::Graph;

/// Hop distance from `source` to every node, `None` where unreachable.
pub(crate) fn bfs_distances(graph: &dyn Graph, source: usize) -> Vec<Option<usize>> {
    let n = graph.node_count();
    let mut dist = vec![None; n];
    if source >= n {
        return dist;
    }
    dist[source] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        let next = dist[v].map_or(0, |d| d + 1);
        for w in graph.out_neighbors(v) {
            if dist[w].is_none() {
                dist[w] = Some(next);
                queue.push_back(w);
            }
        }
    }

    dist
}

/// Single-source shortest path DAG.
pub(crate) struct ShortestPaths {
    /// σ_sv: number of shortest paths from the source to v
    pub sigma: Vec<f64>,
    /// P_s(v): predecessors of v on shortest paths
    pub predecessors: Vec<Vec<usize>>,
    /// Nodes in non-decreasing distance order
    pub order: Vec<usize>,
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn shortest_paths(graph: &dyn Graph, source: usize) -> ShortestPaths {
    let n = graph.node_count();
    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut order = Vec::with_capacity(n);

    sigma[source] = 1.0;
    dist[source] = Some(0);

    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(v) = queue.pop_front() {
        order.push(v);
        let v_dist = dist[v].unwrap_or(0);

        for w in graph.out_neighbors(v) {
            // First time seeing w?
            if dist[w].is_none() {
                dist[w] = Some(v_dist + 1);
                queue.push_back(w);
            }

            // Is this a shortest path to w?
            if dist[w] == Some(v_dist + 1) {
                sigma[w] += sigma[v];
                predecessors[w].push(v);
            }
        }
    }

    ShortestPaths {
        sigma,
        predecessors,
        order,
    }
}

/// Brandes accumulation over every source.
///
/// Returns the raw ordered-pair betweenness of every node. Undirected callers
/// halve the result because each pair is visited from both ends.
pub(crate) fn brandes(graph: &dyn Graph) -> Vec<f64> {
    let n = graph.node_count();
    let mut betweenness = vec![0.0_f64; n];

    for s in 0..n {
        let paths = shortest_paths(graph, s);
        let mut delta = vec![0.0_f64; n];

        // Farthest first
        for &w in paths.order.iter().rev() {
            for &v in &paths.predecessors[w] {
                // δ_s(v) += (σ_sv / σ_sw) × (1 + δ_s(w))
                delta[v] += paths.sigma[v] / paths.sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                betweenness[w] += delta[w];
            }
        }
    }

    betweenness
}
