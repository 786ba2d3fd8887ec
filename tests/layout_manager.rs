//! Layout manager lifecycle tests

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cim_graph_analytics::{
    AdjacencyGraph, CoolingSchedule, Graph, GraphLayoutManager, LayoutManagerConfig, NodeId,
    Position2D,
};

fn id(label: u64) -> NodeId {
    NodeId::from_label(label)
}

fn config() -> LayoutManagerConfig {
    LayoutManagerConfig {
        tick_interval_ms: 2,
        batch_size: 4,
        cooling: CoolingSchedule {
            initial: 80.0,
            rate: 0.9,
            warmup: 2,
        },
        ..LayoutManagerConfig::default()
    }
}

fn graph(edges: &[(u64, u64)]) -> Arc<dyn Graph> {
    Arc::new(AdjacencyGraph::from_labels(false, &[], edges))
}

#[tokio::test]
async fn test_no_updates_after_stop_returns() {
    let manager = GraphLayoutManager::new(config());
    manager.set_graph(graph(&[(1, 2), (2, 3), (3, 4), (4, 1)])).await;
    let events = manager.coordinates().subscribe();

    manager.set_layout_task_active(true).await;
    tokio::time::sleep(Duration::from_millis(40)).await;
    manager.set_layout_task_active(false).await;

    let published: Vec<_> = events.try_iter().collect();
    assert!(published.iter().any(|event| !event.updated.is_empty()));

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(events.try_recv().is_err());
    assert!(!manager.is_running().await);
}

#[tokio::test]
async fn test_immediate_start_stop() {
    let manager = GraphLayoutManager::new(config());
    manager.set_graph(graph(&[(1, 2)])).await;
    let before = manager.coordinates().snapshot();
    let events = manager.coordinates().subscribe();

    manager.set_layout_task_active(true).await;
    manager.set_layout_task_active(false).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(events.try_recv().is_err());
    assert_eq!(manager.coordinates().snapshot(), before);
}

#[tokio::test]
async fn test_restart_resets_cooling() {
    let manager = GraphLayoutManager::new(config());
    manager.set_graph(graph(&[(1, 2), (2, 3)])).await;
    assert_eq!(manager.cooling_parameter(), 80.0);

    manager.set_layout_task_active(true).await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    manager.set_layout_task_active(false).await;

    assert!(manager.iterations() > 2);
    assert!(manager.cooling_parameter() < 80.0);

    manager.set_layout_task_active(true).await;
    assert_eq!(manager.cooling_parameter(), 80.0);
    assert_eq!(manager.iterations(), 0);
    manager.set_layout_task_active(false).await;
}

#[tokio::test]
async fn test_set_graph_while_running_caches_removed_nodes() {
    let manager = GraphLayoutManager::new(config());
    let coords = manager.coordinates();
    manager.set_graph(graph(&[(1, 2), (2, 3)])).await;
    manager.set_layout_task_active(true).await;
    tokio::time::sleep(Duration::from_millis(20)).await;

    manager.set_graph(graph(&[(2, 3), (3, 4)])).await;
    let remembered = coords.cached_position(&id(1)).unwrap();
    assert!(!coords.is_active(&id(1)));
    assert!(coords.is_active(&id(4)));

    // The running task never brings the removed node back
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!coords.is_active(&id(1)));
    assert_eq!(coords.active_count(), 3);

    manager.set_graph(graph(&[(1, 2), (2, 3), (3, 4)])).await;
    assert_eq!(coords.get(&id(1)), Some(remembered));

    manager.set_layout_task_active(false).await;
}

#[tokio::test]
async fn test_new_nodes_land_near_neighbors() {
    let config = LayoutManagerConfig {
        adding_jitter: 10.0,
        ..config()
    };
    let manager = GraphLayoutManager::new(config);
    let coords = manager.coordinates();
    manager.set_graph(graph(&[(1, 2)])).await;

    manager.set_graph(graph(&[(1, 2), (2, 3)])).await;

    let anchor = coords.get(&id(2)).unwrap();
    let placed = coords.get(&id(3)).unwrap();
    assert!(placed.distance_to(&anchor) <= 10.0);
}

#[tokio::test]
async fn test_request_locations_when_idle_writes_through() {
    let manager = GraphLayoutManager::new(config());
    manager.set_graph(graph(&[(1, 2)])).await;

    let target = Position2D::new(5.0, -5.0);
    manager
        .request_locations(HashMap::from([(id(1), target), (id(9), target)]))
        .await;

    let coords = manager.coordinates();
    assert_eq!(coords.get(&id(1)), Some(target));
    // Not part of the graph
    assert!(!coords.is_active(&id(9)));
}

#[tokio::test]
async fn test_request_locations_when_running_is_a_hint() {
    // Gentle cooling so each iteration moves a node at most one unit
    let config = LayoutManagerConfig {
        cooling: CoolingSchedule {
            initial: 1.0,
            rate: 1.0,
            warmup: 0,
        },
        ..config()
    };
    let manager = GraphLayoutManager::new(config);
    manager.set_graph(graph(&[(1, 2), (2, 3)])).await;
    manager.set_layout_task_active(true).await;

    let target = Position2D::new(1000.0, 1000.0);
    manager
        .request_locations(HashMap::from([(id(1), target)]))
        .await;
    assert_ne!(manager.coordinates().get(&id(1)), Some(target));

    tokio::time::sleep(Duration::from_millis(20)).await;
    manager.set_layout_task_active(false).await;

    // The layout picked up the hint and moved on from there
    let iterations = manager.iterations();
    assert!(iterations > 0);
    let position = manager.coordinates().get(&id(1)).unwrap();
    assert!(position.distance_to(&target) <= iterations as f64 + 1e-6);
}

#[tokio::test]
async fn test_config_from_json() {
    let config = tokio_test::assert_ok!(LayoutManagerConfig::from_json(
        r#"{ "tick_interval_ms": 5, "cooling": { "initial": 12.5 } }"#
    ));
    let manager = GraphLayoutManager::new(config);

    assert_eq!(manager.config().tick_interval(), Duration::from_millis(5));
    assert_eq!(manager.cooling_parameter(), 12.5);
    assert!(manager.graph().is_none());
}
