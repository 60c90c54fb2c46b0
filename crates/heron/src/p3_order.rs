//! Phase 3: order the nodes inside each layer to reduce edge crossings.
//!
//! Layer sweeps alternate between forward (each layer sorted by the barycenter of its
//! predecessors) and backward (by successors) until `heron.crossingMinimization.sweeps` sweeps in
//! a row brought no improvement. The best ordering seen is kept.

mod cross_count;

pub use cross_count::cross_count;

use crate::intermediate::IntermediateProcessorStrategy;
use crate::monitor::ProgressMonitor;
use crate::options::LayeredOptions;
use crate::processor::{LayeredConfiguration, LayeredPhase, LayoutPhase, LayoutProcessor};
use heron_graph::{DenseIndex, LGraph, NodeId};

#[derive(Debug, Default)]
pub struct LayerSweepCrossingMinimizer;

impl LayoutProcessor for LayerSweepCrossingMinimizer {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Layer sweep crossing minimization", 1.0);

        let mut order = graph.layer_matrix();
        if order.len() < 2 {
            monitor.done();
            return;
        }
        let sweeps = graph
            .properties
            .get(&LayeredOptions::CROSSING_MINIMIZATION_SWEEPS) as usize;

        let index = DenseIndex::new(order.iter().flatten().copied());
        let mut best = order.clone();
        let mut best_cc = cross_count(graph, &order);
        let initial_cc = best_cc;

        let mut i = 0usize;
        let mut last_best = 0usize;
        while last_best < sweeps && best_cc > 0 {
            let forward = i % 2 == 0;
            sweep(graph, &index, &mut order, forward);

            let cc = cross_count(graph, &order);
            if cc < best_cc {
                best_cc = cc;
                best.clone_from(&order);
                last_best = 0;
            }
            i += 1;
            last_best += 1;
        }

        for (l, nodes) in best.into_iter().enumerate() {
            graph.reorder_layer(l, nodes);
        }
        tracing::trace!(initial_cc, best_cc, sweeps = i, "crossing minimization");
        monitor.done();
    }
}

impl LayoutPhase for LayerSweepCrossingMinimizer {
    fn processor_configuration(&self, _graph: &LGraph) -> LayeredConfiguration {
        let mut config = LayeredConfiguration::new();
        config.add_before(
            LayeredPhase::P3NodeOrdering,
            IntermediateProcessorStrategy::LongEdgeSplitter,
        );
        config
    }
}

fn sweep(graph: &LGraph, index: &DenseIndex, order: &mut [Vec<NodeId>], forward: bool) {
    let mut pos = vec![0usize; index.len()];
    let mut layer_of = vec![usize::MAX; index.len()];
    for (l, layer) in order.iter().enumerate() {
        for (p, n) in layer.iter().enumerate() {
            if let Some(v) = index.get(*n) {
                pos[v] = p;
                layer_of[v] = l;
            }
        }
    }

    let free_layers: Vec<usize> = if forward {
        (1..order.len()).collect()
    } else {
        (0..order.len() - 1).rev().collect()
    };
    for l in free_layers {
        let fixed = if forward { l - 1 } else { l + 1 };

        let mut keyed: Vec<(f64, NodeId)> = order[l]
            .iter()
            .enumerate()
            .map(|(p, n)| {
                let neighbours: Vec<NodeId> = if forward {
                    graph.predecessors(*n).collect()
                } else {
                    graph.successors(*n).collect()
                };
                let (sum, count) = neighbours
                    .into_iter()
                    .filter_map(|w| index.get(w))
                    .filter(|w| layer_of[*w] == fixed)
                    .fold((0.0, 0usize), |(s, c), w| (s + pos[w] as f64, c + 1));
                let barycenter = if count == 0 {
                    p as f64
                } else {
                    sum / count as f64
                };
                (barycenter, *n)
            })
            .collect();
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        order[l] = keyed.into_iter().map(|(_, n)| n).collect();
        for (p, n) in order[l].iter().enumerate() {
            if let Some(v) = index.get(*n) {
                pos[v] = p;
            }
        }
    }
}
