use crate::monitor::ProgressMonitor;
use crate::options::{EdgeLabelPlacement, InternalProperties, LayeredOptions};
use crate::processor::LayoutProcessor;
use heron_graph::{LGraph, LabelId, NodeType, PortSide, Size};

/// Gives the center labels of every edge a layer of their own by routing the edge through a
/// [`NodeType::Label`] dummy that is as large as the stacked labels.
#[derive(Debug, Default)]
pub struct LabelDummyInserter;

impl LayoutProcessor for LabelDummyInserter {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Label dummy insertions", 1.0);

        let label_label = graph.properties.get(&LayeredOptions::SPACING_LABEL_LABEL);
        let edge_label = graph.properties.get(&LayeredOptions::SPACING_EDGE_LABEL);

        let mut inserted = 0usize;
        for e in graph.edge_ids() {
            if graph.is_self_loop(e) {
                continue;
            }
            let center: Vec<LabelId> = graph
                .edge(e)
                .labels
                .iter()
                .copied()
                .filter(|l| {
                    graph
                        .label(*l)
                        .properties
                        .get(&LayeredOptions::EDGE_LABELS_PLACEMENT)
                        == EdgeLabelPlacement::Center
                })
                .collect();
            if center.is_empty() {
                continue;
            }

            let mut size = Size::default();
            for l in &center {
                let label = graph.label(*l).size;
                size.width = size.width.max(label.width);
                size.height += label.height;
            }
            size.height += (center.len() - 1) as f64 * label_label + edge_label;

            let dummy = graph.add_node(NodeType::Label);
            let input = graph.add_port(dummy, PortSide::West);
            let output = graph.add_port(dummy, PortSide::East);
            {
                let node = graph.node_mut(dummy);
                node.size = size;
                node.properties
                    .set(&InternalProperties::REPRESENTED_LABELS, center.clone());
            }

            let target = graph.edge(e).target();
            let properties = graph.edge(e).properties.clone();
            graph.edge_mut(e).labels.retain(|l| !center.contains(l));
            graph.set_edge_target(e, input);
            let tail = graph.add_edge(output, target);
            graph.edge_mut(tail).properties = properties;
            inserted += 1;
        }

        tracing::trace!(inserted, "label dummies");
        monitor.done();
    }
}
