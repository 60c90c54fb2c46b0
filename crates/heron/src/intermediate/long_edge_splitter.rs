use crate::monitor::ProgressMonitor;
use crate::options::InternalProperties;
use crate::processor::LayoutProcessor;
use heron_graph::{EdgeId, LGraph, NodeType, PortSide};

/// Splits every edge that spans more than one layer into a chain of zero-sized
/// [`NodeType::LongEdge`] dummies, one per layer in between.
///
/// The original edge becomes the first segment of the chain and keeps its labels; the other
/// segments copy its properties.
#[derive(Debug, Default)]
pub struct LongEdgeSplitter;

impl LayoutProcessor for LongEdgeSplitter {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Edge splitting", 1.0);

        let mut dummies = 0usize;
        // Dummies are appended to the next layer, so their own out-edges are split when that
        // layer comes up.
        for l in 0..graph.layer_count() {
            let nodes = graph.layer(l).nodes().to_vec();
            for n in nodes {
                let outgoing: Vec<EdgeId> = graph.outgoing_edges(n).collect();
                for e in outgoing {
                    if graph.is_self_loop(e) {
                        continue;
                    }
                    let Some(target_layer) = graph.node_layer_index(graph.edge_target_node(e))
                    else {
                        continue;
                    };
                    if target_layer > l + 1 {
                        split(graph, e, l + 1);
                        dummies += 1;
                    }
                }
            }
        }

        tracing::trace!(dummies, "long edge dummies");
        monitor.done();
    }
}

fn split(graph: &mut LGraph, e: EdgeId, layer_index: usize) {
    let layer = graph.layer(layer_index).id();
    let source_port = graph.edge(e).source();
    let target_port = graph.edge(e).target();

    let source_node = graph.node(graph.port(source_port).node());
    let long_edge_source = if source_node.kind() == NodeType::LongEdge {
        source_node
            .properties
            .get(&InternalProperties::LONG_EDGE_SOURCE)
    } else {
        Some(source_port)
    };

    let dummy = graph.add_node_to_layer(NodeType::LongEdge, layer);
    let input = graph.add_port(dummy, PortSide::West);
    let output = graph.add_port(dummy, PortSide::East);
    graph
        .node_mut(dummy)
        .properties
        .set(&InternalProperties::LONG_EDGE_SOURCE, long_edge_source)
        .set(&InternalProperties::LONG_EDGE_TARGET, Some(target_port));

    let properties = graph.edge(e).properties.clone();
    graph.set_edge_target(e, input);
    let tail = graph.add_edge(output, target_port);
    graph.edge_mut(tail).properties = properties;
}
