//! Thread-safe node position store
//!
//! Nodes are either *active* (part of the live graph, positions
//! authoritative) or *cached* (removed from the graph but remembered so they
//! land in the same place if they come back). The cache is bounded and
//! evicts the longest-deactivated node first.
//!
//! Every mutation happens under one write lock and produces at most one
//! [`CoordinateEvent`], so readers never observe half of a batch.

use std::collections::HashMap;

use crossbeam::channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use crate::events::CoordinateEvent;
use crate::value_objects::{NodeId, Position2D};

/// Configuration for the coordinate store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateConfig {
    /// Maximum number of inactive positions kept for reuse
    pub cache_capacity: usize,
}

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
        }
    }
}

#[derive(Debug, Default)]
struct CoordinateState {
    active: IndexMap<NodeId, Position2D>,
    /// Oldest deactivation first
    cached: IndexMap<NodeId, Position2D>,
    capacity: usize,
}

impl CoordinateState {
    fn evict_overflow(&mut self) -> usize {
        let overflow = self.cached.len().saturating_sub(self.capacity);
        self.cached.drain(..overflow);
        overflow
    }
}

/// Node → position map shared between the layout worker and its readers
#[derive(Debug)]
pub struct CoordinateManager {
    state: RwLock<CoordinateState>,
    subscribers: Mutex<Vec<Sender<CoordinateEvent>>>,
}

impl CoordinateManager {
    /// Create an empty store
    pub fn new(config: CoordinateConfig) -> Self {
        Self {
            state: RwLock::new(CoordinateState {
                capacity: config.cache_capacity,
                ..CoordinateState::default()
            }),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Receive every future change event.
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> Receiver<CoordinateEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Set one position. Returns whether anything changed.
    pub fn put(&self, node: NodeId, position: Position2D) -> bool {
        !self.put_all([(node, position)]).is_empty()
    }

    /// Set many positions atomically.
    ///
    /// Unchanged positions are skipped; nodes not yet active become active
    /// (leaving the cache if they were there). Returns the published event.
    pub fn put_all(
        &self,
        positions: impl IntoIterator<Item = (NodeId, Position2D)>,
    ) -> CoordinateEvent {
        self.apply(positions, true)
    }

    /// Like [`CoordinateManager::put_all`] but only touches nodes that are
    /// already active; everything else is ignored.
    ///
    /// The layout worker publishes through this so a tick computed against
    /// an outdated graph cannot bring deactivated nodes back.
    pub fn update_all(
        &self,
        positions: impl IntoIterator<Item = (NodeId, Position2D)>,
    ) -> CoordinateEvent {
        self.apply(positions, false)
    }

    fn apply(
        &self,
        positions: impl IntoIterator<Item = (NodeId, Position2D)>,
        admit_new: bool,
    ) -> CoordinateEvent {
        let mut state = self.state.write();
        let mut event = CoordinateEvent::default();

        for (node, position) in positions {
            match state.active.get_mut(&node) {
                Some(current) if *current == position => {}
                Some(current) => {
                    *current = position;
                    event.updated.push(node);
                }
                None if admit_new => {
                    state.cached.shift_remove(&node);
                    state.active.insert(node, position);
                    event.added.push(node);
                }
                None => {}
            }
        }

        self.publish(&event);
        event
    }

    /// Add nodes to the active set at the supplied positions.
    ///
    /// Nodes that are already active keep their current position. Returns
    /// the nodes that were activated.
    pub fn activate(
        &self,
        positions: impl IntoIterator<Item = (NodeId, Position2D)>,
    ) -> Vec<NodeId> {
        let mut state = self.state.write();
        let mut added = Vec::new();

        for (node, position) in positions {
            if state.active.contains_key(&node) {
                continue;
            }
            state.cached.shift_remove(&node);
            state.active.insert(node, position);
            added.push(node);
        }

        let event = CoordinateEvent::added(added);
        self.publish(&event);
        event.added
    }

    /// Move cached nodes back to the active set at their remembered
    /// positions.
    ///
    /// Returns the nodes that have no remembered position; the caller has to
    /// place those itself.
    pub fn reactivate(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut state = self.state.write();
        let mut added = Vec::new();
        let mut missing = Vec::new();

        for node in nodes {
            if state.active.contains_key(node) {
                continue;
            }
            match state.cached.shift_remove(node) {
                Some(position) => {
                    state.active.insert(*node, position);
                    added.push(*node);
                }
                None => missing.push(*node),
            }
        }

        self.publish(&CoordinateEvent::added(added));
        missing
    }

    /// Move active nodes to the cache, keeping their positions.
    ///
    /// This is the only way a node leaves the active set. Returns the nodes
    /// that were deactivated.
    pub fn deactivate(&self, nodes: &[NodeId]) -> Vec<NodeId> {
        let mut state = self.state.write();
        let mut removed = Vec::new();

        for node in nodes {
            if let Some(position) = state.active.shift_remove(node) {
                state.cached.insert(*node, position);
                removed.push(*node);
            }
        }

        let evicted = state.evict_overflow();
        if evicted > 0 {
            tracing::debug!("Evicted {} cached positions", evicted);
        }

        let event = CoordinateEvent::removed(removed);
        self.publish(&event);
        event.removed
    }

    /// Check whether every node has a known position, active or cached
    pub fn locates_all(&self, nodes: &[NodeId]) -> bool {
        let state = self.state.read();
        nodes
            .iter()
            .all(|node| state.active.contains_key(node) || state.cached.contains_key(node))
    }

    /// Position of an active node
    pub fn get(&self, node: &NodeId) -> Option<Position2D> {
        self.state.read().active.get(node).copied()
    }

    /// Remembered position of an inactive node
    pub fn cached_position(&self, node: &NodeId) -> Option<Position2D> {
        self.state.read().cached.get(node).copied()
    }

    /// Copy of all active positions
    pub fn snapshot(&self) -> HashMap<NodeId, Position2D> {
        self.state
            .read()
            .active
            .iter()
            .map(|(node, position)| (*node, *position))
            .collect()
    }

    /// Active nodes in activation order
    pub fn active_nodes(&self) -> Vec<NodeId> {
        self.state.read().active.keys().copied().collect()
    }

    pub fn is_active(&self, node: &NodeId) -> bool {
        self.state.read().active.contains_key(node)
    }

    pub fn is_cached(&self, node: &NodeId) -> bool {
        self.state.read().cached.contains_key(node)
    }

    pub fn active_count(&self) -> usize {
        self.state.read().active.len()
    }

    pub fn cached_count(&self) -> usize {
        self.state.read().cached.len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.state.read().capacity
    }

    /// Change the cache bound, evicting immediately if it shrank
    pub fn set_cache_capacity(&self, capacity: usize) {
        let mut state = self.state.write();
        state.capacity = capacity;
        state.evict_overflow();
    }

    /// Forget all inactive positions
    pub fn clear_cache(&self) {
        self.state.write().cached.clear();
    }

    fn publish(&self, event: &CoordinateEvent) {
        if event.is_empty() {
            return;
        }
        // Closed receivers unsubscribe themselves
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl Default for CoordinateManager {
    fn default() -> Self {
        Self::new(CoordinateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pos(x: f64, y: f64) -> Position2D {
        Position2D::new(x, y)
    }

    #[test]
    fn test_put_notifies_only_changes() {
        let coords = CoordinateManager::default();
        let rx = coords.subscribe();
        let a = NodeId::new();
        let b = NodeId::new();

        coords.put_all([(a, pos(0.0, 0.0)), (b, pos(1.0, 1.0))]);
        let first = rx.try_recv().unwrap();
        assert_eq!(first.added, vec![a, b]);

        // Same positions: nothing published
        assert!(!coords.put(a, pos(0.0, 0.0)));
        assert!(rx.try_recv().is_err());

        coords.put_all([(a, pos(0.0, 0.0)), (b, pos(2.0, 2.0))]);
        let second = rx.try_recv().unwrap();
        assert!(second.added.is_empty());
        assert_eq!(second.updated, vec![b]);
    }

    #[test]
    fn test_update_all_ignores_inactive_nodes() {
        let coords = CoordinateManager::default();
        let active = NodeId::new();
        let cached = NodeId::new();
        coords.put_all([(active, pos(0.0, 0.0)), (cached, pos(1.0, 1.0))]);
        coords.deactivate(&[cached]);

        let event = coords.update_all([
            (active, pos(2.0, 2.0)),
            (cached, pos(3.0, 3.0)),
            (NodeId::new(), pos(4.0, 4.0)),
        ]);

        assert_eq!(event.updated, vec![active]);
        assert!(event.added.is_empty());
        assert_eq!(coords.active_count(), 1);
        assert_eq!(coords.cached_position(&cached), Some(pos(1.0, 1.0)));
    }

    #[test]
    fn test_deactivate_then_reactivate_restores_position() {
        let coords = CoordinateManager::default();
        let node = NodeId::new();
        coords.put(node, pos(3.5, -7.25));

        assert_eq!(coords.deactivate(&[node]), vec![node]);
        assert!(!coords.is_active(&node));
        assert!(coords.is_cached(&node));
        assert_eq!(coords.get(&node), None);
        assert!(coords.locates_all(&[node]));

        let missing = coords.reactivate(&[node]);
        assert!(missing.is_empty());
        assert_eq!(coords.get(&node), Some(pos(3.5, -7.25)));
        assert!(!coords.is_cached(&node));
    }

    #[test]
    fn test_reactivate_reports_unknown_nodes() {
        let coords = CoordinateManager::default();
        let unknown = NodeId::new();
        assert_eq!(coords.reactivate(&[unknown]), vec![unknown]);
        assert!(!coords.locates_all(&[unknown]));
    }

    #[test]
    fn test_eviction_drops_oldest_deactivated_first() {
        let coords = CoordinateManager::new(CoordinateConfig { cache_capacity: 2 });
        let nodes: Vec<NodeId> = (0..4).map(|_| NodeId::new()).collect();
        for (i, node) in nodes.iter().enumerate() {
            coords.put(*node, pos(i as f64, 0.0));
        }

        coords.deactivate(&[nodes[2]]);
        coords.deactivate(&[nodes[0]]);
        coords.deactivate(&[nodes[1]]);

        assert_eq!(coords.cached_count(), 2);
        assert!(!coords.locates_all(&[nodes[2]]));
        assert!(coords.is_cached(&nodes[0]));
        assert!(coords.is_cached(&nodes[1]));
        // Active entries are never evicted
        assert!(coords.is_active(&nodes[3]));
    }

    #[test]
    fn test_shrinking_capacity_evicts() {
        let coords = CoordinateManager::default();
        let a = NodeId::new();
        let b = NodeId::new();
        coords.put_all([(a, pos(0.0, 0.0)), (b, pos(1.0, 0.0))]);
        coords.deactivate(&[a, b]);

        coords.set_cache_capacity(1);
        assert_eq!(coords.cache_capacity(), 1);
        assert!(!coords.is_cached(&a));
        assert!(coords.is_cached(&b));

        coords.clear_cache();
        assert_eq!(coords.cached_count(), 0);
    }

    #[test]
    fn test_large_deactivation_keeps_newest() {
        let coords = CoordinateManager::new(CoordinateConfig { cache_capacity: 3 });
        let nodes: Vec<NodeId> = (0..5000).map(|_| NodeId::new()).collect();
        coords.put_all(nodes.iter().enumerate().map(|(i, node)| (*node, pos(i as f64, 0.0))));

        coords.deactivate(&nodes);

        assert_eq!(coords.active_count(), 0);
        assert_eq!(coords.cached_count(), 3);
        for (i, node) in nodes.iter().enumerate().skip(4997) {
            assert_eq!(coords.cached_position(node), Some(pos(i as f64, 0.0)));
        }
        assert!(!coords.is_cached(&nodes[0]));
        assert!(!coords.is_cached(&nodes[4996]));
    }

    #[test]
    fn test_activate_keeps_existing_positions() {
        let coords = CoordinateManager::default();
        let a = NodeId::new();
        let b = NodeId::new();
        coords.put(a, pos(1.0, 1.0));

        let added = coords.activate([(a, pos(9.0, 9.0)), (b, pos(2.0, 2.0))]);
        assert_eq!(added, vec![b]);
        assert_eq!(coords.get(&a), Some(pos(1.0, 1.0)));
        assert_eq!(coords.get(&b), Some(pos(2.0, 2.0)));
        assert_eq!(coords.active_nodes(), vec![a, b]);
    }

    #[test]
    fn test_put_on_cached_node_reactivates_it() {
        let coords = CoordinateManager::default();
        let rx = coords.subscribe();
        let node = NodeId::new();
        coords.put(node, pos(1.0, 1.0));
        coords.deactivate(&[node]);
        coords.put(node, pos(5.0, 5.0));

        let events: Vec<CoordinateEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[1].removed, vec![node]);
        assert_eq!(events[2].added, vec![node]);
        assert!(!coords.is_cached(&node));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let coords = CoordinateManager::default();
        drop(coords.subscribe());
        let rx = coords.subscribe();

        coords.put(NodeId::new(), pos(0.0, 0.0));
        assert_eq!(coords.subscribers.lock().len(), 1);
        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_concurrent_batches_are_atomic() {
        let coords = Arc::new(CoordinateManager::default());
        let nodes: Vec<NodeId> = (0..50).map(|_| NodeId::new()).collect();
        coords.put_all(nodes.iter().map(|n| (*n, pos(0.0, 0.0))));

        let writer = {
            let coords = coords.clone();
            let nodes = nodes.clone();
            std::thread::spawn(move || {
                for tick in 1..200 {
                    let value = tick as f64;
                    coords.put_all(nodes.iter().map(|n| (*n, pos(value, value))));
                }
            })
        };

        for _ in 0..200 {
            let snapshot = coords.snapshot();
            let first = snapshot[&nodes[0]];
            assert!(snapshot.values().all(|p| *p == first), "torn batch observed");
        }

        writer.join().unwrap();
    }
}
