//! Phase 2: assign every layerless node to a layer.
//!
//! Both strategies guarantee that every non-self-loop edge points from a lower layer index to a
//! strictly higher one, provided the graph is acyclic.

mod longest_path;
mod longest_path_source;

pub use longest_path::LongestPathLayerer;
pub use longest_path_source::LongestPathSourceLayerer;

use crate::options::LayeringStrategy;
use crate::processor::LayoutPhase;
use heron_graph::{DenseIndex, LGraph, NodeId};

impl LayeringStrategy {
    pub fn create(self) -> Box<dyn LayoutPhase> {
        match self {
            LayeringStrategy::LongestPath => Box::new(LongestPathLayerer),
            LayeringStrategy::LongestPathSource => Box::new(LongestPathSourceLayerer),
        }
    }
}

const UNVISITED: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Along {
    Incoming,
    Outgoing,
}

/// Longest path lengths (in nodes) ending at (`Incoming`) or starting from (`Outgoing`) each
/// node of `nodes`, listed in the order the depth-first visits finish. Edges leaving the node
/// set and self-loops are ignored.
fn heights(graph: &LGraph, nodes: &[NodeId], along: Along) -> Vec<(NodeId, usize)> {
    let index = DenseIndex::new(nodes.iter().copied());
    let mut heights = vec![UNVISITED; index.len()];
    let mut finished = Vec::with_capacity(index.len());

    fn visit(
        graph: &LGraph,
        index: &DenseIndex,
        v: usize,
        along: Along,
        heights: &mut [i32],
        finished: &mut Vec<(NodeId, usize)>,
    ) -> i32 {
        if heights[v] != UNVISITED {
            return heights[v];
        }
        let node = index.node(v);
        let mut max = 1;
        let edges: Vec<_> = match along {
            Along::Incoming => graph.incoming_edges(node).collect(),
            Along::Outgoing => graph.outgoing_edges(node).collect(),
        };
        for e in edges {
            let other = match along {
                Along::Incoming => graph.edge_source_node(e),
                Along::Outgoing => graph.edge_target_node(e),
            };
            if other == node {
                continue;
            }
            let Some(w) = index.get(other) else {
                continue;
            };
            max = max.max(visit(graph, index, w, along, heights, finished) + 1);
        }
        heights[v] = max;
        finished.push((node, max as usize));
        max
    }

    for v in 0..index.len() {
        visit(graph, &index, v, along, &mut heights, &mut finished);
    }

    for n in nodes {
        let h = index.get(*n).map(|v| heights[v]).unwrap_or(UNVISITED);
        assert!(h > 0, "node {n:?} left unvisited by the layering pass");
    }
    finished
}
