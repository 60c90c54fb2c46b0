use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use heron::NullMonitor;
use heron::graph::{LGraph, NodeId, NodeType};
use heron::intermediate::NodePromoter;
use heron::options::{LayeredOptions, NodePromotionStrategy};
use heron::p2_layers::LongestPathLayerer;
use heron::processor::LayoutProcessor;
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct GraphSpec {
    node_count: usize,
    edges: Vec<(usize, usize)>,
}

impl GraphSpec {
    /// Builds the graph and layers it, ready for promotion.
    fn build(&self, strategy: NodePromotionStrategy) -> LGraph {
        let mut g = LGraph::new();
        g.properties
            .set(&LayeredOptions::NODE_PROMOTION_STRATEGY, strategy)
            .set(&LayeredOptions::NODE_PROMOTION_MAX_ITERATIONS, 50);
        let nodes: Vec<NodeId> = (0..self.node_count)
            .map(|i| {
                let n = g.add_node(NodeType::Normal);
                g.node_mut(n)
                    .properties
                    .set(&LayeredOptions::MODEL_ORDER, i as i64);
                n
            })
            .collect();
        for &(from, to) in &self.edges {
            g.connect(nodes[from], nodes[to]);
        }
        LongestPathLayerer.process(&mut g, &mut NullMonitor);
        g
    }
}

fn build_dag_spec(node_count: usize, fanout: usize) -> GraphSpec {
    let mut edges = Vec::new();

    // A spine keeps the layering deep.
    for i in 0..node_count.saturating_sub(1) {
        edges.push((i, i + 1));
    }

    // Long forward edges give promotion something to shorten.
    for i in 0..node_count {
        for k in 1..=fanout {
            let to = i + k * 7;
            if to >= node_count {
                break;
            }
            edges.push((i, to));
        }
    }

    GraphSpec { node_count, edges }
}

fn bench_node_promotion(c: &mut Criterion) {
    let mut group = c.benchmark_group("node_promotion");
    group.measurement_time(Duration::from_secs(10));

    let strategies = [
        ("nikolov", NodePromotionStrategy::Nikolov),
        ("nikolov_improved", NodePromotionStrategy::NikolovImproved),
        ("dummy_percentage", NodePromotionStrategy::DummyNodePercentage),
        ("model_order_ltr", NodePromotionStrategy::ModelOrderLeftToRight),
    ];
    let cases = [("dag_100_f2", 100usize, 2usize), ("dag_400_f3", 400, 3)];

    for (case, nodes, fanout) in cases {
        let spec = build_dag_spec(nodes, fanout);
        for (name, strategy) in strategies {
            group.bench_with_input(BenchmarkId::new(name, case), &spec, |b, spec| {
                b.iter_batched(
                    || spec.build(strategy),
                    |mut g| {
                        NodePromoter.process(black_box(&mut g), &mut NullMonitor);
                        black_box(g.layer_count());
                    },
                    BatchSize::LargeInput,
                )
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_node_promotion);
criterion_main!(benches);
