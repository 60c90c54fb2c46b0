//! Node sizing.
//!
//! The layered pipeline only decides *when* nodes are sized (once ordering is final); how is up
//! to a [`NodeSizeCalculator`]. [`DefaultNodeSizeCalculator`] grows nodes to fit their labels
//! and ports and places both.

use crate::options::{LayeredOptions, PortLabelSide, get_with_fallback};
use heron_graph::{LGraph, LabelId, NodeId, Point, PortId, PortSide, Size};

pub trait NodeSizeCalculator: Send + Sync {
    /// Computes and writes the final size of each of `nodes`, along with the positions of
    /// their ports and labels.
    fn calculate(&self, graph: &mut LGraph, nodes: &[NodeId]);
}

/// Never shrinks a node below its current size or `heron.nodeSize.minimum`.
///
/// Node labels are stacked and centered. Ports are spread evenly along their side, sitting
/// just outside the node border; ports with an undefined side go to the node center. Port
/// labels are placed next to their port, outside or inside the node.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNodeSizeCalculator;

impl NodeSizeCalculator for DefaultNodeSizeCalculator {
    fn calculate(&self, graph: &mut LGraph, nodes: &[NodeId]) {
        for &n in nodes {
            size_node(graph, n);
        }
    }
}

fn size_node(graph: &mut LGraph, n: NodeId) {
    let node = graph.node(n);
    let (local, global) = (&node.properties, &graph.properties);
    let label_label = get_with_fallback(local, global, &LayeredOptions::SPACING_LABEL_LABEL);
    let label_node = get_with_fallback(local, global, &LayeredOptions::SPACING_LABEL_NODE);
    let port_port = get_with_fallback(local, global, &LayeredOptions::SPACING_PORT_PORT);
    let minimum = node.properties.get(&LayeredOptions::NODE_SIZE_MINIMUM);

    let labels = node.labels.clone();
    let mut label_block = Size::default();
    for l in &labels {
        let size = graph.label(*l).size;
        label_block.width = label_block.width.max(size.width);
        label_block.height += size.height;
    }
    if !labels.is_empty() {
        label_block.height += (labels.len() - 1) as f64 * label_label;
    }

    let ports = node.ports().to_vec();
    let on_side = |side: PortSide| -> Vec<PortId> {
        ports
            .iter()
            .copied()
            .filter(|p| graph.port(*p).side == side)
            .collect()
    };
    let (north, east, south, west, undefined) = (
        on_side(PortSide::North),
        on_side(PortSide::East),
        on_side(PortSide::South),
        on_side(PortSide::West),
        on_side(PortSide::Undefined),
    );
    let span = |ports: &[PortId], along_x: bool| -> f64 {
        let sizes: f64 = ports
            .iter()
            .map(|p| {
                let s = graph.port(*p).size;
                if along_x { s.width } else { s.height }
            })
            .sum();
        sizes + (ports.len() + 1) as f64 * port_port
    };

    let mut size = node.size;
    size.width = size.width.max(minimum.width);
    size.height = size.height.max(minimum.height);
    if !labels.is_empty() {
        size.width = size.width.max(label_block.width + 2.0 * label_node);
        size.height = size.height.max(label_block.height + 2.0 * label_node);
    }
    if !north.is_empty() || !south.is_empty() {
        size.width = size.width.max(span(&north, true)).max(span(&south, true));
    }
    if !east.is_empty() || !west.is_empty() {
        size.height = size.height.max(span(&east, false)).max(span(&west, false));
    }
    graph.node_mut(n).size = size;

    let mut y = (size.height - label_block.height) / 2.0;
    for l in labels {
        let label = graph.label_mut(l);
        label.position.x = (size.width - label.size.width) / 2.0;
        label.position.y = y;
        y += label.size.height + label_label;
    }

    for (side, ports) in [
        (PortSide::North, north),
        (PortSide::East, east),
        (PortSide::South, south),
        (PortSide::West, west),
    ] {
        let count = ports.len() as f64;
        for (i, p) in ports.into_iter().enumerate() {
            let port = graph.port_mut(p);
            let fraction = (i + 1) as f64 / (count + 1.0);
            port.position = match side {
                PortSide::North => Point::new(
                    size.width * fraction - port.size.width / 2.0,
                    -port.size.height,
                ),
                PortSide::South => Point::new(
                    size.width * fraction - port.size.width / 2.0,
                    size.height,
                ),
                PortSide::East => Point::new(
                    size.width,
                    size.height * fraction - port.size.height / 2.0,
                ),
                _ => Point::new(
                    -port.size.width,
                    size.height * fraction - port.size.height / 2.0,
                ),
            };
            place_port_labels(graph, n, p);
        }
    }
    for p in undefined {
        let port = graph.port_mut(p);
        port.position = Point::new(
            (size.width - port.size.width) / 2.0,
            (size.height - port.size.height) / 2.0,
        );
    }
}

fn place_port_labels(graph: &mut LGraph, n: NodeId, p: PortId) {
    let node = graph.node(n);
    let (local, global) = (&node.properties, &graph.properties);
    let horizontal = get_with_fallback(
        local,
        global,
        &LayeredOptions::SPACING_LABEL_PORT_HORIZONTAL,
    );
    let vertical = get_with_fallback(local, global, &LayeredOptions::SPACING_LABEL_PORT_VERTICAL);
    let label_label = get_with_fallback(local, global, &LayeredOptions::SPACING_LABEL_LABEL);
    let placement = get_with_fallback(local, global, &LayeredOptions::PORT_LABELS_PLACEMENT);
    if placement.side == PortLabelSide::Fixed {
        return;
    }
    let inside = placement.side == PortLabelSide::Inside;

    let port = graph.port(p);
    let (side, port_size) = (port.side, port.size);
    let labels = port.labels.clone();
    let mut y = match (side, inside) {
        (PortSide::North, false) => -vertical - stacked_height(graph, &labels, label_label),
        (PortSide::North, true) | (PortSide::East | PortSide::West, _) => {
            port_size.height + vertical
        }
        (PortSide::South, false) => port_size.height + vertical,
        (PortSide::South, true) => -vertical - stacked_height(graph, &labels, label_label),
        (PortSide::Undefined, _) => 0.0,
    };
    for l in labels {
        let label = graph.label_mut(l);
        let west_like = matches!((side, inside), (PortSide::West, false) | (PortSide::East, true));
        label.position.x = if west_like {
            -label.size.width - horizontal
        } else {
            port_size.width + horizontal
        };
        label.position.y = y;
        y += label.size.height + label_label;
    }
}

fn stacked_height(graph: &LGraph, labels: &[LabelId], spacing: f64) -> f64 {
    let sum: f64 = labels.iter().map(|l| graph.label(*l).size.height).sum();
    sum + labels.len().saturating_sub(1) as f64 * spacing
}
