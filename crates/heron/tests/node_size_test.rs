use heron::graph::{LGraph, NodeType, Point, PortSide, Size};
use heron::node_size::{DefaultNodeSizeCalculator, NodeSizeCalculator};
use heron::options::{LayeredOptions, PortLabelPlacement};

#[test]
fn default_node_size_fits_labels_with_padding() {
    let mut g = LGraph::new();
    let n = g.add_node(NodeType::Normal);
    let label = g.add_node_label(n, Size::new(30.0, 10.0));

    DefaultNodeSizeCalculator.calculate(&mut g, &[n]);

    assert_eq!(g.node(n).size, Size::new(40.0, 20.0));
    assert_eq!(g.label(label).position, Point::new(5.0, 5.0));
}

#[test]
fn default_node_size_respects_minimum_and_existing_size() {
    let mut g = LGraph::new();
    let small = g.add_node(NodeType::Normal);
    g.add_node_label(small, Size::new(30.0, 10.0));
    g.node_mut(small)
        .properties
        .set(&LayeredOptions::NODE_SIZE_MINIMUM, Size::new(50.0, 50.0));
    let big = g.add_node(NodeType::Normal);
    g.node_mut(big).size = Size::new(80.0, 60.0);

    DefaultNodeSizeCalculator.calculate(&mut g, &[small, big]);

    assert_eq!(g.node(small).size, Size::new(50.0, 50.0));
    assert_eq!(g.node(big).size, Size::new(80.0, 60.0));
}

#[test]
fn default_node_size_spreads_ports_along_their_side() {
    let mut g = LGraph::new();
    let n = g.add_node(NodeType::Normal);
    g.add_node_label(n, Size::new(30.0, 10.0));
    let ports: Vec<_> = (0..3)
        .map(|_| {
            let p = g.add_port(n, PortSide::East);
            g.port_mut(p).size = Size::new(4.0, 4.0);
            p
        })
        .collect();
    let north = g.add_port(n, PortSide::North);
    let center = g.add_port(n, PortSide::Undefined);

    DefaultNodeSizeCalculator.calculate(&mut g, &[n]);

    // Three ports of height 4 plus four gaps of 10.
    assert_eq!(g.node(n).size, Size::new(40.0, 52.0));
    let ys: Vec<f64> = ports.iter().map(|p| g.port(*p).position.y).collect();
    assert_eq!(ys, vec![11.0, 24.0, 37.0]);
    assert!(ports.iter().all(|p| g.port(*p).position.x == 40.0));
    assert_eq!(g.port(north).position, Point::new(20.0, 0.0));
    assert_eq!(g.port(center).position, Point::new(20.0, 26.0));
}

#[test]
fn default_node_size_places_port_labels_outside() {
    let mut g = LGraph::new();
    let n = g.add_node(NodeType::Normal);
    let east = g.add_port(n, PortSide::East);
    let west = g.add_port(n, PortSide::West);
    g.port_mut(east).size = Size::new(4.0, 4.0);
    g.port_mut(west).size = Size::new(4.0, 4.0);
    let east_label = g.add_port_label(east, Size::new(8.0, 3.0));
    let west_label = g.add_port_label(west, Size::new(8.0, 3.0));

    DefaultNodeSizeCalculator.calculate(&mut g, &[n]);

    assert_eq!(g.label(east_label).position, Point::new(5.0, 5.0));
    assert_eq!(g.label(west_label).position, Point::new(-9.0, 5.0));
}

#[test]
fn default_node_size_places_port_labels_inside() {
    let mut g = LGraph::new();
    g.properties
        .set(&LayeredOptions::PORT_LABELS_PLACEMENT, PortLabelPlacement::INSIDE);
    let n = g.add_node(NodeType::Normal);
    let east = g.add_port(n, PortSide::East);
    let south = g.add_port(n, PortSide::South);
    let east_label = g.add_port_label(east, Size::new(8.0, 3.0));
    let south_label = g.add_port_label(south, Size::new(8.0, 3.0));

    DefaultNodeSizeCalculator.calculate(&mut g, &[n]);

    assert_eq!(g.label(east_label).position, Point::new(-9.0, 1.0));
    assert_eq!(g.label(south_label).position, Point::new(1.0, -4.0));
}
