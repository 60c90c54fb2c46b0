use super::{Along, heights};
use crate::monitor::ProgressMonitor;
use crate::processor::{LayoutPhase, LayoutProcessor};
use heron_graph::LGraph;

/// Places each node in the layer matching the longest path from any source to it: sources
/// (and isolated nodes) land in the first layer.
#[derive(Debug, Default)]
pub struct LongestPathSourceLayerer;

impl LayoutProcessor for LongestPathSourceLayerer {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Longest path to source layering", 1.0);

        let nodes = graph.layerless_nodes().to_vec();
        let heights = heights(graph, &nodes, Along::Incoming);
        for (node, height) in heights {
            while graph.layer_count() < height {
                graph.append_layer();
            }
            let layer = graph.layer(height - 1).id();
            graph.set_layer(node, layer);
        }
        graph.clear_layerless_nodes();

        monitor.done();
    }
}

impl LayoutPhase for LongestPathSourceLayerer {}
