//! Dummy-reducing promotion after Nikolov, Tarassov and Branke.
//!
//! Layers are numbered in reverse while promoting: the last layer of the graph is layer 0, so
//! promoting a node means incrementing its layer number and moves it toward the sources.

use super::{NikolovPlan, StopCriterion, WidthBound};
use crate::options::LayeredOptions;
use heron_graph::{DenseIndex, LGraph};

/// Everything a promotion pass mutates. Accepted states are kept as snapshots; a rejected
/// promotion is undone by restoring the last one.
#[derive(Debug, Clone, PartialEq)]
struct Layering {
    layer_of: Vec<usize>,
    height: usize,
    dummy_count: i64,
    width: Vec<i64>,
    width_pixel: Vec<f64>,
}

impl Layering {
    fn max_width(&self) -> i64 {
        self.width.iter().copied().max().unwrap_or(0)
    }

    fn max_width_pixel(&self) -> f64 {
        self.width_pixel.iter().copied().fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Degree {
    incoming: i64,
    outgoing: i64,
}

struct Promotion {
    index: DenseIndex,
    predecessors: Vec<Vec<usize>>,
    degree: Vec<Degree>,
    node_size: Vec<f64>,
    with_incoming: Vec<usize>,
    dummy_size: f64,
    max_width: i64,
    max_width_pixel: f64,
    current: Layering,
}

#[derive(Debug, Clone, Copy)]
struct Outcome {
    dummy_delta: i64,
    width_ok: bool,
}

pub(super) fn promote(graph: &mut LGraph, plan: NikolovPlan) {
    let mut promotion = Promotion::new(graph);
    let initial = promotion.current.clone();

    promotion.run(plan.bound, plan.stop);
    if let Some(bound) = plan.fallback {
        let exceeded = match bound {
            WidthBound::Unbounded => false,
            WidthBound::NodeCount => promotion.current.max_width() > promotion.max_width,
            WidthBound::Pixels => promotion.current.max_width_pixel() > promotion.max_width_pixel,
        };
        // The bounded pass restarts from the input layering.
        if exceeded {
            promotion.current = initial;
            promotion.run(bound, plan.stop);
        }
    }

    promotion.write_back(graph);
}

impl Promotion {
    fn new(graph: &LGraph) -> Self {
        let node_size_affix = graph.properties.get(&LayeredOptions::SPACING_NODE_NODE);
        let dummy_size = graph
            .properties
            .get(&LayeredOptions::SPACING_EDGE_NODE_BETWEEN_LAYERS);

        let index = DenseIndex::new(
            graph
                .layers()
                .iter()
                .flat_map(|l| l.nodes().iter().copied()),
        );
        let n = index.len();
        let height = graph.layer_count();

        let mut current = Layering {
            layer_of: vec![0; n],
            height,
            dummy_count: 0,
            width: vec![0; height],
            width_pixel: vec![0.0; height],
        };
        let mut predecessors = vec![Vec::new(); n];
        let mut degree = vec![Degree::default(); n];
        let mut node_size = vec![0.0; n];
        let mut with_incoming = Vec::new();
        let mut max_width = 0;
        let mut max_width_pixel: f64 = 0.0;
        let mut dummy_baggage: i64 = 0;

        for (l, layer) in graph.layers().iter().enumerate() {
            let layer_id = height - 1 - l;
            let mut incoming = 0;
            let mut outgoing = 0;
            let mut layer_pixels = 0.0;
            for &node in layer.nodes() {
                let Some(v) = index.get(node) else {
                    continue;
                };
                current.layer_of[v] = layer_id;
                node_size[v] = graph.node(node).size.height + node_size_affix;
                layer_pixels += node_size[v];

                for e in graph.incoming_edges(node) {
                    let source = graph.edge_source_node(e);
                    if source == node {
                        continue;
                    }
                    degree[v].incoming += 1;
                    if let Some(u) = index.get(source) {
                        if !predecessors[v].contains(&u) {
                            predecessors[v].push(u);
                        }
                    }
                }
                degree[v].outgoing = graph
                    .outgoing_edges(node)
                    .filter(|e| !graph.is_self_loop(*e))
                    .count() as i64;
                incoming += degree[v].incoming;
                outgoing += degree[v].outgoing;
                if degree[v].incoming > 0 {
                    with_incoming.push(v);
                }
            }

            // Edges ending here need no dummy in this layer.
            dummy_baggage -= incoming;
            let width = layer.len() as i64 + dummy_baggage;
            layer_pixels += dummy_baggage as f64 * dummy_size;
            current.width[layer_id] = width;
            current.width_pixel[layer_id] = layer_pixels;
            max_width = max_width.max(width);
            max_width_pixel = max_width_pixel.max(layer_pixels);
            current.dummy_count += dummy_baggage;
            dummy_baggage += outgoing;
        }

        Self {
            index,
            predecessors,
            degree,
            node_size,
            with_incoming,
            dummy_size,
            max_width,
            max_width_pixel,
            current,
        }
    }

    fn within_bound(&self, bound: WidthBound, pos: usize) -> bool {
        let cur = &self.current;
        match bound {
            WidthBound::Unbounded => true,
            WidthBound::NodeCount => {
                cur.width[pos] <= self.max_width && cur.width[pos - 1] <= self.max_width
            }
            WidthBound::Pixels => {
                cur.width_pixel[pos] <= self.max_width_pixel
                    && cur.width_pixel[pos - 1] <= self.max_width_pixel
            }
        }
    }

    /// Moves `v` one layer toward the sources, dragging along predecessors it would otherwise
    /// share a layer with. Mutates `current` unconditionally.
    fn promote_node(&mut self, v: usize, bound: WidthBound) -> Outcome {
        let mut width_ok = true;
        let mut dummy_delta = 0;
        let size = self.node_size[v];
        let Degree { incoming, outgoing } = self.degree[v];

        let cur = &mut self.current;
        let mut pos = cur.layer_of[v];
        cur.width[pos] += -1 + outgoing;
        cur.width_pixel[pos] += -size + outgoing as f64 * self.dummy_size;

        pos += 1;
        if pos >= cur.height {
            cur.height += 1;
            cur.width.push(1);
            cur.width_pixel.push(size);
        } else {
            cur.width[pos] += 1 - incoming;
            cur.width_pixel[pos] += size - incoming as f64 * self.dummy_size;
        }

        if !self.within_bound(bound, pos) {
            width_ok = false;
        }

        for k in 0..self.predecessors[v].len() {
            let u = self.predecessors[v][k];
            if self.current.layer_of[u] == pos {
                let outcome = self.promote_node(u, bound);
                dummy_delta += outcome.dummy_delta;
                width_ok &= outcome.width_ok;
            }
        }

        self.current.layer_of[v] = pos;
        dummy_delta += outgoing - incoming;
        Outcome {
            dummy_delta,
            width_ok,
        }
    }

    /// Sweeps until a sweep promotes nothing or `stop` says enough.
    fn run(&mut self, bound: WidthBound, stop: StopCriterion) {
        let limit = match stop {
            StopCriterion::Never => None,
            StopCriterion::NodeCountPercentage(pct) => {
                Some(percentage_of(self.index.len() as i64, pct))
            }
            StopCriterion::DummyPercentage(pct) => {
                Some(percentage_of(self.current.dummy_count, pct))
            }
        };

        let mut backup = self.current.clone();
        let mut iterations: i64 = 0;
        let mut reduced: i64 = 0;
        loop {
            let mut promotions = 0usize;
            for k in 0..self.with_incoming.len() {
                let v = self.with_incoming[k];
                let outcome = self.promote_node(v, bound);
                if outcome.dummy_delta < 0 && outcome.width_ok {
                    promotions += 1;
                    self.current.dummy_count += outcome.dummy_delta;
                    reduced += backup.dummy_count - self.current.dummy_count;
                    backup = self.current.clone();
                } else {
                    self.current = backup.clone();
                }
            }
            iterations += 1;

            let keep_going = match (stop, limit) {
                (StopCriterion::NodeCountPercentage(_), Some(n)) => iterations < n,
                (StopCriterion::DummyPercentage(_), Some(n)) => reduced < n,
                _ => true,
            };
            if promotions == 0 || !keep_going {
                break;
            }
        }
    }

    /// Rebuilds the graph's layers; layer number `k` becomes graph layer `height - 1 - k`.
    fn write_back(&self, graph: &mut LGraph) {
        let height = self.current.height;
        let mut layering = vec![Vec::new(); height];
        for (v, node) in self.index.nodes().iter().enumerate() {
            layering[height - 1 - self.current.layer_of[v]].push(*node);
        }
        graph.replace_layering(layering);
    }
}

fn percentage_of(count: i64, pct: u32) -> i64 {
    (count as f64 * f64::from(pct) / 100.0).ceil() as i64
}
