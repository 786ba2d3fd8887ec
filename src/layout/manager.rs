//! Background layout driver
//!
//! [`GraphLayoutManager`] owns an [`IterativeGraphLayout`], a
//! [`CoordinateManager`] and, while active, one tokio task that runs a batch
//! of layout iterations every tick and publishes the result.
//!
//! While the task runs, graph changes and position requests are queued and
//! applied by the task at the start of its next tick, so the layout is only
//! ever touched from one place at a time. Each batch runs on tokio's blocking
//! pool; the async side only sleeps and waits for it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::config::{CoolingSchedule, LayoutManagerConfig};
use super::coordinates::CoordinateManager;
use super::force_directed::ForceDirectedLayout;
use super::placement;
use super::IterativeGraphLayout;
use crate::abstraction::Graph;
use crate::value_objects::{NodeId, Position2D};

/// Work handed from the manager to a running layout task
enum LayoutRequest {
    Graph(Arc<dyn Graph>),
    Positions {
        positions: HashMap<NodeId, Position2D>,
        force_reset: bool,
    },
}

struct LayoutTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
    requests: Sender<LayoutRequest>,
}

impl LayoutTask {
    fn submit(&self, request: LayoutRequest) {
        if self.requests.send(request).is_err() {
            warn!("Layout task is gone, dropping request");
        }
    }
}

/// Drives an iterative layout and keeps a [`CoordinateManager`] up to date
pub struct GraphLayoutManager<L: IterativeGraphLayout + 'static = ForceDirectedLayout> {
    config: LayoutManagerConfig,
    coordinates: Arc<CoordinateManager>,
    layout: Arc<Mutex<L>>,
    graph: RwLock<Option<Arc<dyn Graph>>>,
    iterations: Arc<AtomicU64>,
    task: tokio::sync::Mutex<Option<LayoutTask>>,
}

impl GraphLayoutManager<ForceDirectedLayout> {
    /// Manager running a [`ForceDirectedLayout`]
    pub fn new(config: LayoutManagerConfig) -> Self {
        let layout = ForceDirectedLayout::new(config.force);
        Self::with_layout(config, layout)
    }
}

impl Default for GraphLayoutManager<ForceDirectedLayout> {
    fn default() -> Self {
        Self::new(LayoutManagerConfig::default())
    }
}

impl<L: IterativeGraphLayout + 'static> GraphLayoutManager<L> {
    /// Manager around any layout. Invalid config values fall back to their
    /// defaults (see [`LayoutManagerConfig::sanitized`]).
    pub fn with_layout(config: LayoutManagerConfig, mut layout: L) -> Self {
        let config = config.sanitized();
        layout.set_cooling_parameter(config.cooling.initial);
        Self {
            coordinates: Arc::new(CoordinateManager::new(config.coordinates)),
            layout: Arc::new(Mutex::new(layout)),
            graph: RwLock::new(None),
            iterations: Arc::new(AtomicU64::new(0)),
            task: tokio::sync::Mutex::new(None),
            config,
        }
    }

    pub fn config(&self) -> &LayoutManagerConfig {
        &self.config
    }

    /// Shared coordinate store; subscribe to it for position updates
    pub fn coordinates(&self) -> Arc<CoordinateManager> {
        Arc::clone(&self.coordinates)
    }

    /// Graph currently being laid out
    pub fn graph(&self) -> Option<Arc<dyn Graph>> {
        self.graph.read().clone()
    }

    /// Current cooling parameter of the layout
    pub fn cooling_parameter(&self) -> f64 {
        self.layout.lock().cooling_parameter()
    }

    /// Iterations run since the layout task was last started
    pub fn iterations(&self) -> u64 {
        self.iterations.load(Ordering::Acquire)
    }

    pub async fn is_running(&self) -> bool {
        self.task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Start or stop the background layout task.
    ///
    /// Starting resets the cooling schedule and seeds the layout with the
    /// current coordinates; starting an already running task does nothing.
    /// Stopping returns only after the task has exited, and no position
    /// update is published after that. Must be called within a tokio runtime.
    pub async fn set_layout_task_active(&self, active: bool) {
        let mut task = self.task.lock().await;

        if active {
            if let Some(running) = task.as_ref() {
                if !running.handle.is_finished() {
                    return;
                }
            }
            if let Some(finished) = task.take() {
                Self::join(finished).await;
            }
            *task = Some(self.spawn_task());
            info!("Layout task started");
        } else if let Some(running) = task.take() {
            running.token.cancel();
            Self::join(running).await;
            info!(
                "Layout task stopped after {} iterations",
                self.iterations()
            );
        }
    }

    /// Replace the graph being laid out.
    ///
    /// The first graph is placed on a ring. Later graphs keep the positions
    /// of nodes they share with the previous one, bring back remembered
    /// positions of returning nodes and place the rest near their neighbors.
    /// Nodes that are no longer part of the graph are deactivated.
    pub async fn set_graph(&self, graph: Arc<dyn Graph>) {
        let task = self.task.lock().await;
        let nodes = graph.nodes();
        let previous = self.graph.write().replace(Arc::clone(&graph));

        let vanished: Vec<NodeId> = self
            .coordinates
            .active_nodes()
            .into_iter()
            .filter(|node| !graph.contains_node(node))
            .collect();
        if !vanished.is_empty() {
            self.coordinates.deactivate(&vanished);
        }

        if previous.is_none() {
            self.coordinates
                .activate(placement::ring_positions(&nodes, self.config.placement_radius));
        } else if self.coordinates.locates_all(&nodes) {
            self.coordinates.reactivate(&nodes);
        } else {
            self.place_new_nodes(&*graph, &nodes);
        }

        debug!(
            "Graph set: {} nodes, {} edges, {} deactivated",
            graph.node_count(),
            graph.edge_count(),
            vanished.len()
        );

        let snapshot = self.coordinates.snapshot();
        match task.as_ref() {
            Some(running) => {
                running.submit(LayoutRequest::Graph(graph));
                running.submit(LayoutRequest::Positions {
                    positions: snapshot,
                    force_reset: true,
                });
            }
            None => self.layout.lock().request_positions(snapshot, true),
        }
    }

    /// Ask for nodes to be moved.
    ///
    /// With the task idle the positions are written straight to the
    /// coordinate store. While it runs they are only a hint to the layout,
    /// which publishes wherever it ends up after its next tick. Nodes outside
    /// the current graph are ignored once a graph is set.
    pub async fn request_locations(&self, positions: HashMap<NodeId, Position2D>) {
        let task = self.task.lock().await;
        let positions = match self.graph() {
            Some(graph) => positions
                .into_iter()
                .filter(|(node, _)| graph.contains_node(node))
                .collect(),
            None => positions,
        };

        match task.as_ref() {
            Some(running) => running.submit(LayoutRequest::Positions {
                positions,
                force_reset: false,
            }),
            None => {
                self.coordinates.put_all(positions);
            }
        }
    }

    /// Reactivate or place every node that is not active yet
    fn place_new_nodes(&self, graph: &dyn Graph, nodes: &[NodeId]) {
        let entering: Vec<NodeId> = nodes
            .iter()
            .filter(|node| !self.coordinates.is_active(node))
            .copied()
            .collect();
        let missing = self.coordinates.reactivate(&entering);
        if !missing.is_empty() {
            let known = self.coordinates.snapshot();
            let placed = placement::adding_positions(
                graph,
                &missing,
                &known,
                self.config.placement_radius,
                self.config.adding_jitter,
                &mut rand::thread_rng(),
            );
            self.coordinates.activate(placed);
        }

        debug!(
            "{} nodes entered the graph, {} placed fresh",
            entering.len(),
            missing.len()
        );
    }

    fn spawn_task(&self) -> LayoutTask {
        {
            let mut layout = self.layout.lock();
            layout.set_cooling_parameter(self.config.cooling.initial);
            layout.request_positions(self.coordinates.snapshot(), true);
        }
        self.iterations.store(0, Ordering::Release);

        let (tx, rx) = unbounded();
        let token = CancellationToken::new();
        let worker = LayoutWorker {
            layout: Arc::clone(&self.layout),
            coordinates: Arc::clone(&self.coordinates),
            graph: self.graph(),
            requests: rx,
            iterations: Arc::clone(&self.iterations),
            cooling: self.config.cooling,
            batch_size: self.config.batch_size,
            token: token.clone(),
        };
        let handle = tokio::spawn(worker.run(self.config.tick_interval()));

        LayoutTask {
            token,
            handle,
            requests: tx,
        }
    }

    async fn join(task: LayoutTask) {
        match task.handle.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => debug!("Layout task was cancelled by the runtime"),
            Err(e) => warn!("Layout task failed: {}", e),
        }
    }
}

impl<L: IterativeGraphLayout + 'static> Drop for GraphLayoutManager<L> {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.token.cancel();
        }
    }
}

/// State moved into the background task
struct LayoutWorker<L> {
    layout: Arc<Mutex<L>>,
    coordinates: Arc<CoordinateManager>,
    graph: Option<Arc<dyn Graph>>,
    requests: Receiver<LayoutRequest>,
    iterations: Arc<AtomicU64>,
    cooling: CoolingSchedule,
    batch_size: usize,
    token: CancellationToken,
}

impl<L: IterativeGraphLayout + 'static> LayoutWorker<L> {
    async fn run(self, interval: Duration) {
        let mut worker = self;
        loop {
            tokio::select! {
                biased;
                _ = worker.token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
            let batch = tokio::task::spawn_blocking(move || {
                let keep_going = worker.tick();
                (worker, keep_going)
            });
            match batch.await {
                Ok((returned, true)) => worker = returned,
                Ok((_, false)) => break,
                Err(e) => {
                    warn!("Layout batch failed: {}", e);
                    return;
                }
            }
        }
        debug!("Layout worker exiting");
    }

    /// Apply queued requests, run one batch and publish it.
    /// Returns false when cancelled mid-batch; that batch is discarded.
    fn tick(&mut self) -> bool {
        let mut layout = self.layout.lock();

        for request in self.requests.try_iter() {
            match request {
                LayoutRequest::Graph(graph) => self.graph = Some(graph),
                LayoutRequest::Positions {
                    positions,
                    force_reset,
                } => layout.request_positions(positions, force_reset),
            }
        }

        let Some(graph) = self.graph.as_deref() else {
            return true;
        };

        for _ in 0..self.batch_size {
            if self.token.is_cancelled() {
                return false;
            }
            let k = self.iterations.load(Ordering::Acquire);
            layout.set_cooling_parameter(self.cooling.at(k));
            layout.iterate(graph);
            self.iterations.fetch_add(1, Ordering::AcqRel);
        }

        let positions = layout.positions();
        drop(layout);

        if self.token.is_cancelled() {
            return false;
        }
        let event = self.coordinates.update_all(
            positions
                .into_iter()
                .filter(|(node, position)| graph.contains_node(node) && position.is_finite()),
        );
        if !event.is_empty() {
            debug!("Layout tick moved {} nodes", event.updated.len());
        }
        true
    }
}
