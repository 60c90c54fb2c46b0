use crate::monitor::ProgressMonitor;
use crate::options::{InternalProperties, LayeredOptions};
use crate::processor::LayoutProcessor;
use heron_graph::{EdgeId, LGraph, NodeId, NodeType};

/// Removes long-edge and label dummies again. The edge entering a dummy absorbs the edge
/// leaving it: it takes over its target, gains a bend point at the dummy's center followed by
/// the other edge's bend points, and takes over its labels. Labels represented by a label
/// dummy are stacked inside the dummy's box and handed back to the edge.
#[derive(Debug, Default)]
pub struct LongEdgeJoiner;

impl LayoutProcessor for LongEdgeJoiner {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Edge joining", 1.0);

        let label_label = graph.properties.get(&LayeredOptions::SPACING_LABEL_LABEL);
        // Left to right, so a chain always folds into its first segment.
        for l in 0..graph.layer_count() {
            let nodes = graph.layer(l).nodes().to_vec();
            for n in nodes {
                if matches!(graph.node(n).kind(), NodeType::LongEdge | NodeType::Label) {
                    join(graph, n, label_label);
                }
            }
        }

        monitor.done();
    }
}

fn join(graph: &mut LGraph, dummy: NodeId, label_label: f64) {
    let incoming: Option<EdgeId> = graph.incoming_edges(dummy).next();
    let outgoing: Option<EdgeId> = graph.outgoing_edges(dummy).next();
    let (Some(incoming), Some(outgoing)) = (incoming, outgoing) else {
        tracing::warn!(?dummy, "dummy node without an edge on both sides");
        graph.remove_node(dummy);
        return;
    };

    let node = graph.node(dummy);
    let center = node.center();
    let mut represented = Vec::new();
    if node.kind() == NodeType::Label {
        let (position, width) = (node.position, node.size.width);
        let labels = node
            .properties
            .get(&InternalProperties::REPRESENTED_LABELS);
        let mut y = position.y;
        for l in labels {
            let label = graph.label_mut(l);
            label.position.x = position.x + (width - label.size.width) / 2.0;
            label.position.y = y;
            y += label.size.height + label_label;
            represented.push(l);
        }
    }

    let (bend_points, labels, target) = {
        let out = graph.edge_mut(outgoing);
        (
            std::mem::take(&mut out.bend_points),
            std::mem::take(&mut out.labels),
            out.target(),
        )
    };
    let edge = graph.edge_mut(incoming);
    edge.bend_points.push(center);
    edge.bend_points.extend(bend_points);
    edge.labels.extend(represented);
    edge.labels.extend(labels);

    graph.set_edge_target(incoming, target);
    graph.remove_edge(outgoing);
    graph.remove_node(dummy);
}
