use conduit_planner::graph::{build_graph, components};
use conduit_planner::metrics::{aggregate, analyze};
use conduit_planner::{Connection, Coordinate, Network, PipelineRef};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// A grid of `pipelines` deployed and empty polylines with `points` nodes
/// each, plus a chain of links alternating between the two kinds and
/// `extra_links` parallel links on top.
fn synthetic_network(pipelines: usize, points: usize, extra_links: usize) -> (Network, Vec<Connection>) {
    let polyline = |row: f64, col: usize| -> Vec<Coordinate> {
        (0..points)
            .map(|i| Coordinate::new(41.30 + row * 0.002, 2.10 + col as f64 * 0.01 + i as f64 * 0.0005))
            .collect()
    };
    let deployed: Vec<_> = (0..pipelines).map(|idx| polyline(0.0, idx)).collect();
    let empty: Vec<_> = (0..pipelines).map(|idx| polyline(1.0, idx)).collect();

    let mut connections = Vec::new();
    for idx in 0..pipelines {
        connections.push(Connection {
            start: deployed[idx][points - 1],
            end: empty[idx][0],
            start_pipeline: PipelineRef::deployed(idx),
            end_pipeline: PipelineRef::empty(idx),
        });
        if idx + 1 < pipelines && idx % 3 != 2 {
            connections.push(Connection {
                start: empty[idx][points - 1],
                end: deployed[idx + 1][0],
                start_pipeline: PipelineRef::empty(idx),
                end_pipeline: PipelineRef::deployed(idx + 1),
            });
        }
    }
    for idx in 0..extra_links {
        let duplicate = connections[idx % connections.len()].clone();
        connections.push(duplicate);
    }
    (Network::new(deployed, empty), connections)
}

fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");
    for size in [10usize, 100, 1000] {
        let (_, connections) = synthetic_network(size, 4, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &connections, |b, data| {
            b.iter(|| {
                let graph = build_graph(black_box(data));
                black_box(components(&graph).len());
            });
        });
    }
    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for (pipelines, points) in [(10usize, 8usize), (50, 20), (200, 20)] {
        let (network, connections) = synthetic_network(pipelines, points, 0);
        let graph = build_graph(&connections);
        let comps = components(&graph);
        group.bench_with_input(
            BenchmarkId::new("pipelines", format!("{pipelines}x{points}")),
            &(network, connections, comps),
            |b, (network, connections, comps)| {
                b.iter(|| {
                    let metrics = aggregate(comps, connections, network).expect("aggregate failed");
                    black_box(metrics.connected_coordinates.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let (network, connections) = synthetic_network(100, 12, 50);
    c.bench_function("analyze_end_to_end", |b| {
        b.iter(|| {
            let analysis = analyze(black_box(&network), black_box(&connections)).expect("analyze failed");
            black_box(analysis.metrics.connection_distance);
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_components, bench_aggregate, bench_end_to_end
);
criterion_main!(benches);
