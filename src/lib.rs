//! Graph analytics and incremental layout
//!
//! Centrality metrics over an abstract [`Graph`], group metrics over node
//! subsets, and a force-directed layout kept running in a background task
//! that publishes into a thread-safe coordinate store.

pub mod abstraction;
pub mod events;
pub mod layout;
pub mod metrics;
pub mod value_objects;

// Re-export graph abstraction
pub use abstraction::{AdjacencyGraph, Graph, GraphError, GraphResult};

// Re-export metrics
pub use metrics::{
    ensure_supported, AdditiveNodeMetric, AdditiveSubsetMetric, BetweennessCentrality,
    ClosenessCentrality, DecayCentrality, DegreeCentrality, EigenCentrality, EigenConfig,
    GraphMetric, MetricError, MetricResult, SubsetMetric,
};

// Re-export layout types
pub use layout::{
    CoolingSchedule, CoordinateConfig, CoordinateManager, ForceDirectedLayout,
    ForceLayoutConfig, GraphLayoutManager, IterativeGraphLayout, LayoutError,
    LayoutManagerConfig,
};

pub use events::CoordinateEvent;
pub use value_objects::{NodeId, Position2D};
