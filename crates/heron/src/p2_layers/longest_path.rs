use super::{Along, heights};
use crate::monitor::ProgressMonitor;
use crate::processor::{LayoutPhase, LayoutProcessor};
use heron_graph::LGraph;

/// Places each node according to the longest path from it to any sink: sinks (and isolated
/// nodes) land in the last layer.
#[derive(Debug, Default)]
pub struct LongestPathLayerer;

impl LayoutProcessor for LongestPathLayerer {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Longest path layering", 1.0);

        let nodes = graph.layerless_nodes().to_vec();
        // Nodes enter their layers as their visits finish.
        let heights = heights(graph, &nodes, Along::Outgoing);
        for (node, height) in heights {
            while graph.layer_count() < height {
                graph.insert_layer(0);
            }
            let layer = graph.layer(graph.layer_count() - height).id();
            graph.set_layer(node, layer);
        }
        graph.clear_layerless_nodes();

        monitor.done();
    }
}

impl LayoutPhase for LongestPathLayerer {}
