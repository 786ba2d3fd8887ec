//! Graph layout
//!
//! This module contains the incremental force-directed layout, the shared
//! coordinate store it publishes into, and the manager that drives it from a
//! background task.

use std::collections::HashMap;

use crate::abstraction::Graph;
use crate::value_objects::{NodeId, Position2D};

pub mod config;
pub mod coordinates;
pub mod force_directed;
pub mod manager;
pub mod placement;

pub use config::{CoolingSchedule, LayoutError, LayoutManagerConfig};
pub use coordinates::{CoordinateConfig, CoordinateManager};
pub use force_directed::{ForceDirectedLayout, ForceLayoutConfig};
pub use manager::GraphLayoutManager;
pub use placement::{adding_positions, ring_positions};

/// A layout that refines positions one step at a time.
///
/// Implementations keep their own position map. Nodes of the graph without
/// a position are left alone by [`IterativeGraphLayout::iterate`].
pub trait IterativeGraphLayout: Send {
    /// Run one relaxation step against `graph`
    fn iterate(&mut self, graph: &dyn Graph);

    /// Hand positions to the layout.
    ///
    /// With `force_reset` the given map replaces the current state, otherwise
    /// it is merged in.
    fn request_positions(&mut self, positions: HashMap<NodeId, Position2D>, force_reset: bool);

    /// Current position of every placed node
    fn positions(&self) -> HashMap<NodeId, Position2D>;

    /// Maximum distance a node may move in one iteration
    fn cooling_parameter(&self) -> f64;

    fn set_cooling_parameter(&mut self, value: f64);
}
