use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use cim_graph_analytics::layout::ring_positions;
use cim_graph_analytics::{
    AdjacencyGraph, BetweennessCentrality, ClosenessCentrality, DecayCentrality,
    EigenCentrality, ForceDirectedLayout, Graph, GraphMetric, IterativeGraphLayout,
};

/// Ring with a chord every tenth node
fn ring_with_chords(n: u64) -> AdjacencyGraph {
    let mut edges: Vec<(u64, u64)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    edges.extend((0..n).step_by(10).map(|i| (i, (i + n / 2) % n)));
    AdjacencyGraph::from_labels(false, &[], &edges)
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_values");

    for n in [100u64, 500] {
        let graph = ring_with_chords(n);
        let metrics: Vec<(&str, Box<dyn GraphMetric>)> = vec![
            ("betweenness", Box::new(BetweennessCentrality)),
            ("closeness", Box::new(ClosenessCentrality::SUM)),
            ("eigen", Box::new(EigenCentrality::default())),
            ("decay", Box::new(DecayCentrality::new(0.5).unwrap())),
        ];

        for (name, metric) in &metrics {
            group.bench_with_input(BenchmarkId::new(*name, n), &graph, |b, graph| {
                b.iter(|| metric.all_values(black_box(graph)))
            });
        }
    }

    group.finish();
}

fn bench_layout_iteration(c: &mut Criterion) {
    let graph = ring_with_chords(200);
    let mut layout = ForceDirectedLayout::default();
    layout.request_positions(ring_positions(&graph.nodes(), 300.0).into_iter().collect(), true);

    c.bench_function("force_layout_iterate_200_nodes", |b| {
        b.iter(|| layout.iterate(black_box(&graph)))
    });
}

criterion_group!(benches, bench_metrics, bench_layout_iteration);
criterion_main!(benches);
