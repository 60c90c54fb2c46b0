//! Node sizing and label placement for external port dummies.
//!
//! Normal nodes are handed to the [`NodeSizeCalculator`]. External port dummies are not: their
//! labels are placed here so that later margin computations reserve the space the labels
//! will need once the dummies are turned back into ports of the enclosing graph.

use crate::monitor::ProgressMonitor;
use crate::node_size::NodeSizeCalculator;
use crate::options::{
    InternalProperties, LayeredOptions, PortLabelPlacement, PortLabelSide, get_with_fallback,
};
use crate::processor::LayoutProcessor;
use heron_graph::{LGraph, NodeId, NodeType, PortId, PortSide, Rect};
use std::sync::Arc;

pub struct LabelAndNodeSizeProcessor {
    node_sizes: Arc<dyn NodeSizeCalculator>,
}

impl LabelAndNodeSizeProcessor {
    pub fn new(node_sizes: Arc<dyn NodeSizeCalculator>) -> Self {
        Self { node_sizes }
    }
}

impl LayoutProcessor for LabelAndNodeSizeProcessor {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Node and port label placement and node sizing", 1.0);

        let layered: Vec<NodeId> = graph
            .layers()
            .iter()
            .flat_map(|l| l.nodes().iter().copied())
            .collect();
        let normal: Vec<NodeId> = layered
            .iter()
            .copied()
            .filter(|n| graph.node(*n).kind() == NodeType::Normal)
            .collect();
        self.node_sizes.calculate(graph, &normal);

        if graph
            .properties
            .get(&InternalProperties::GRAPH_PROPERTIES)
            .external_ports
        {
            for n in layered {
                if graph.node(n).kind() == NodeType::ExternalPort {
                    place_external_port_dummy_labels(graph, n);
                }
            }
        }

        monitor.done();
    }
}

fn place_external_port_dummy_labels(graph: &mut LGraph, dummy: NodeId) {
    let node = graph.node(dummy);
    let (local, global) = (&node.properties, &graph.properties);
    let label_port_horizontal = get_with_fallback(
        local,
        global,
        &LayeredOptions::SPACING_LABEL_PORT_HORIZONTAL,
    );
    let label_port_vertical =
        get_with_fallback(local, global, &LayeredOptions::SPACING_LABEL_PORT_VERTICAL);
    let label_label = get_with_fallback(local, global, &LayeredOptions::SPACING_LABEL_LABEL);
    let placement = get_with_fallback(local, global, &LayeredOptions::PORT_LABELS_PLACEMENT);
    let treat_as_group =
        get_with_fallback(local, global, &LayeredOptions::PORT_LABELS_TREAT_AS_GROUP);
    let side = node.properties.get(&InternalProperties::EXT_PORT_SIDE);
    let dummy_size = node.size;

    // External port dummies carry exactly one port.
    let Some(&port) = node.ports().first() else {
        return;
    };
    let Some(mut label_box) = port_label_box(graph, port, label_label) else {
        return;
    };
    let port_pos = graph.port(port).position;
    let label_height = if treat_as_group {
        label_box.height
    } else {
        graph.label(graph.port(port).labels[0]).size.height
    };

    match placement.side {
        PortLabelSide::Inside => match side {
            PortSide::North => {
                label_box.x = (dummy_size.width - label_box.width) / 2.0 - port_pos.x;
                label_box.y = label_port_vertical;
            }
            PortSide::South => {
                label_box.x = (dummy_size.width - label_box.width) / 2.0 - port_pos.x;
                label_box.y = -label_port_vertical - label_box.height;
            }
            PortSide::East | PortSide::West => {
                label_box.y = if label_next_to_port(graph, port, true, placement) {
                    (dummy_size.height - label_height) / 2.0 - port_pos.y
                } else {
                    dummy_size.height + label_port_vertical - port_pos.y
                };
                label_box.x = if side == PortSide::East {
                    -label_port_horizontal - label_box.width
                } else {
                    label_port_horizontal
                };
            }
            PortSide::Undefined => {}
        },
        PortLabelSide::Outside => match side {
            PortSide::North | PortSide::South => {
                label_box.x = port_pos.x + label_port_horizontal;
            }
            PortSide::East | PortSide::West => {
                label_box.y = if label_next_to_port(graph, port, false, placement) {
                    (dummy_size.height - label_height) / 2.0 - port_pos.y
                } else {
                    port_pos.y + label_port_vertical
                };
            }
            PortSide::Undefined => {}
        },
        // No side-specific offset: the labels stack from the dummy's origin.
        PortLabelSide::Fixed => {}
    }

    let labels = graph.port(port).labels.clone();
    let mut current_y = label_box.y;
    for l in labels {
        let label = graph.label_mut(l);
        label.position.x = label_box.x;
        label.position.y = current_y;
        current_y += label.size.height + label_label;
    }
}

/// The box needed to stack the labels of `port` vertically: as wide as the widest label, as
/// high as all labels plus `label_spacing` between each two. `None` if the port has no labels.
pub fn port_label_box(graph: &LGraph, port: PortId, label_spacing: f64) -> Option<Rect> {
    let labels = &graph.port(port).labels;
    if labels.is_empty() {
        return None;
    }
    let mut result = Rect::default();
    for l in labels {
        let size = graph.label(*l).size;
        result.width = result.width.max(size.width);
        result.height += size.height;
    }
    result.height += (labels.len() - 1) as f64 * label_spacing;
    Some(result)
}

/// Whether the labels of `port` go next to it rather than below it.
fn label_next_to_port(
    graph: &LGraph,
    port: PortId,
    inside: bool,
    placement: PortLabelPlacement,
) -> bool {
    if !placement.next_to_port_if_possible {
        return false;
    }
    let port = graph.port(port);
    if inside {
        port.incoming_edges().is_empty() && port.outgoing_edges().is_empty()
    } else {
        !port
            .properties
            .get(&InternalProperties::CONNECTED_TO_EXTERNAL_NODES)
    }
}
