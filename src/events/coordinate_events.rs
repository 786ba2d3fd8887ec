//! Coordinate change events
//!
//! The coordinate store is the only structure shared between the layout
//! worker and its readers, and these events are the only signal that crosses
//! between them.

use serde::{Deserialize, Serialize};

use crate::value_objects::NodeId;

/// A batch of changes applied to the coordinate store in one step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateEvent {
    /// Nodes that entered the active set
    pub added: Vec<NodeId>,
    /// Nodes that left the active set (moved to the cache)
    pub removed: Vec<NodeId>,
    /// Active nodes whose position changed
    pub updated: Vec<NodeId>,
}

impl CoordinateEvent {
    /// Event announcing newly active nodes
    pub fn added(nodes: Vec<NodeId>) -> Self {
        Self {
            added: nodes,
            ..Self::default()
        }
    }

    /// Event announcing deactivated nodes
    pub fn removed(nodes: Vec<NodeId>) -> Self {
        Self {
            removed: nodes,
            ..Self::default()
        }
    }

    /// Check if the event carries any change
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    /// Total number of nodes touched
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.updated.len()
    }
}
