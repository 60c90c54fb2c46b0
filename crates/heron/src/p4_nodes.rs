//! Phase 4: assign y coordinates.

use crate::intermediate::IntermediateProcessorStrategy;
use crate::monitor::ProgressMonitor;
use crate::options::LayeredOptions;
use crate::processor::{LayeredConfiguration, LayeredPhase, LayoutPhase, LayoutProcessor};
use heron_graph::{LGraph, NodeType};

/// Stacks the nodes of each layer top to bottom in their final order, then centers every
/// layer against the tallest one.
#[derive(Debug, Default)]
pub struct SimpleNodePlacer;

impl LayoutProcessor for SimpleNodePlacer {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Simple node placement", 1.0);

        let node_node = graph.properties.get(&LayeredOptions::SPACING_NODE_NODE);
        let edge_node = graph.properties.get(&LayeredOptions::SPACING_EDGE_NODE);

        let mut heights = Vec::with_capacity(graph.layer_count());
        for l in 0..graph.layer_count() {
            let nodes = graph.layer(l).nodes().to_vec();
            let mut y = 0.0;
            let mut previous: Option<NodeType> = None;
            for n in nodes {
                let node = graph.node_mut(n);
                if let Some(prev) = previous {
                    y += if prev == NodeType::Normal && node.kind() == NodeType::Normal {
                        node_node
                    } else {
                        edge_node
                    };
                }
                node.position.y = y;
                y += node.size.height;
                previous = Some(node.kind());
            }
            heights.push(y);
        }

        let max_height = heights.iter().copied().fold(0.0, f64::max);
        for (l, height) in heights.into_iter().enumerate() {
            let offset = (max_height - height) / 2.0;
            let nodes = graph.layer(l).nodes().to_vec();
            for n in nodes {
                graph.node_mut(n).position.y += offset;
            }
            graph.layer_mut(l).size.height = height;
        }

        monitor.done();
    }
}

impl LayoutPhase for SimpleNodePlacer {
    fn processor_configuration(&self, _graph: &LGraph) -> LayeredConfiguration {
        let mut config = LayeredConfiguration::new();
        config.add_before(
            LayeredPhase::P4NodePlacement,
            IntermediateProcessorStrategy::LabelAndNodeSizeProcessor,
        );
        config
    }
}
