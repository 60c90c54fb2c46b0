//! Phase 5: assign x coordinates and route edges as polylines.
//!
//! Every layer gets the width of its widest node; nodes are centered inside their layer.
//! Edges between adjacent layers are straight. Bend points through dummy nodes are added when
//! the dummies are joined back into their edges, after this phase. Self-loops are routed over
//! the top of their node.

use crate::intermediate::IntermediateProcessorStrategy;
use crate::monitor::ProgressMonitor;
use crate::options::{InternalProperties, LayeredOptions};
use crate::processor::{LayeredConfiguration, LayeredPhase, LayoutPhase, LayoutProcessor};
use heron_graph::{EdgeId, LGraph, Point, Size};

#[derive(Debug, Default)]
pub struct PolylineEdgeRouter;

impl LayoutProcessor for PolylineEdgeRouter {
    fn process(&mut self, graph: &mut LGraph, monitor: &mut dyn ProgressMonitor) {
        monitor.begin("Polyline edge routing", 1.0);

        let between_layers = graph
            .properties
            .get(&LayeredOptions::SPACING_NODE_NODE_BETWEEN_LAYERS);
        let edge_node = graph.properties.get(&LayeredOptions::SPACING_EDGE_NODE);

        let mut x = 0.0;
        let mut height: f64 = 0.0;
        let layer_count = graph.layer_count();
        for l in 0..layer_count {
            let nodes = graph.layer(l).nodes().to_vec();
            let width = nodes
                .iter()
                .map(|n| graph.node(*n).size.width)
                .fold(0.0, f64::max);
            for n in nodes {
                let node = graph.node_mut(n);
                node.position.x = x + (width - node.size.width) / 2.0;
            }
            let layer = graph.layer_mut(l);
            layer.size.width = width;
            height = height.max(layer.size.height);
            x += width;
            if l + 1 < layer_count {
                x += between_layers;
            }
        }

        for e in graph.edge_ids() {
            graph.edge_mut(e).bend_points.clear();
            if graph.is_self_loop(e) {
                let route = self_loop_route(graph, e, edge_node);
                graph.edge_mut(e).bend_points = route;
            }
        }

        graph
            .properties
            .set(&InternalProperties::GRAPH_SIZE, Size::new(x, height));
        monitor.done();
    }
}

impl LayoutPhase for PolylineEdgeRouter {
    fn processor_configuration(&self, _graph: &LGraph) -> LayeredConfiguration {
        let mut config = LayeredConfiguration::new();
        config.add_after(
            LayeredPhase::P5EdgeRouting,
            IntermediateProcessorStrategy::LongEdgeJoiner,
        );
        config
    }
}

fn self_loop_route(graph: &LGraph, e: EdgeId, offset: f64) -> Vec<Point> {
    let edge = graph.edge(e);
    let node = graph.node(graph.edge_source_node(e));
    let source = node.position.offset(graph.port(edge.source()).anchor());
    let target = node.position.offset(graph.port(edge.target()).anchor());
    let top = node.position.y - offset;
    let right = source.x.max(node.position.x + node.size.width) + offset;
    let left = target.x.min(node.position.x) - offset;
    vec![
        Point::new(right, source.y),
        Point::new(right, top),
        Point::new(left, top),
        Point::new(left, target.y),
    ]
}
